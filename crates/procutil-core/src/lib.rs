//! procutil-core: shared types, errors, and capability detection for procutil
//!
//! This crate provides the foundational types used by all procutil sub-crates:
//! - Error type and Result alias
//! - Runtime kernel capability detection (pidfds, PR_SET_MM_MAP)

pub mod capabilities;
pub mod error;

pub use capabilities::KernelCapabilities;
pub use error::{ProcError, Result};
