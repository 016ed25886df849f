//! procutil: low-level process primitives for Linux
//!
//! Four independent building blocks for code that manages child processes:
//!
//! - **Process handles**: pidfds for race-free liveness checks and signals
//! - **Blocking waits**: waitpid(2) loops that absorb EINTR
//! - **Argument lists**: growable NULL-terminated vectors for execve(2)
//! - **Process titles**: rewrite `/proc/self/cmdline` via PR_SET_MM_MAP
//!
//! Every operation returns a [`Result`] carrying a [`ProcError`]; nothing
//! in this crate terminates the process on failure.
//!
//! # Example
//!
//! ```ignore
//! use procutil::{ArgvList, PidFd, spawn, wait_for_exit};
//!
//! let argv = ArgvList::from_strs(["/bin/sleep", "1"])?;
//! let child = spawn(&argv, &ArgvList::new())?;
//! let handle = PidFd::open(child)?;
//! assert!(handle.is_alive());
//! wait_for_exit(child)?;
//! ```

pub mod spawn;

// Re-export sub-crate types for convenience
pub use procutil_argv::{ArgvList, NullTerminatedList};
pub use procutil_core::{self as core, KernelCapabilities, ProcError, Result};
pub use procutil_pidfd::{PidFd, PidFdFlags};
pub use procutil_title::{
    ProcTitle, StatLayout, StatSource, TitleBuffer, read_process_title, set_process_title,
};
pub use procutil_wait::{RawWaitStatus, Waiter, wait_for_exit, wait_for_exit_status};

pub use spawn::{SpawnConfig, spawn, spawn_with};
