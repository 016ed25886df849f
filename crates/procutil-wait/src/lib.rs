//! procutil-wait: blocking waits that survive signal interruption
//!
//! Both entry points block until the requested pid terminates, retrying
//! transparently on EINTR and on reaping a different pid.

pub mod status;
pub mod wait;

pub use status::RawWaitStatus;
pub use wait::{
    SysWaiter, Waiter, wait_for_exit, wait_for_exit_status, wait_for_exit_status_with,
    wait_for_exit_with,
};
