//! procutil-argv: NULL-terminated lists for argv/envp construction
//!
//! Lists keep an explicit trailing empty slot so they can be handed to C
//! interfaces such as execve(2) without a conversion step that could fail.

pub mod list;

pub use list::{ArgvList, NullTerminatedList};
