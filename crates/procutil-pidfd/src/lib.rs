//! procutil-pidfd: process handles backed by pidfds
//!
//! A pidfd refers to one process instance. Unlike a numeric pid it can never
//! be confused with a later process that happens to reuse the same id, which
//! makes liveness checks and signal delivery race-free.

pub mod pidfd;

pub use pidfd::{PidFd, PidFdFlags};
