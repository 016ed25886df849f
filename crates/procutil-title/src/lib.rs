//! procutil-title: process title rewriting
//!
//! The kernel exposes whatever lies between `arg_start` and `arg_end` of a
//! process as its command line. Setting a title therefore means allocating
//! a buffer for it and pointing the argument region at that buffer with
//! `prctl(PR_SET_MM, PR_SET_MM_MAP)`, which replaces the whole memory-layout
//! descriptor at once. The remaining boundaries are taken from
//! `/proc/self/stat`.
//!
//! # Example
//!
//! ```ignore
//! procutil_title::set_process_title("worker: idle")?;
//! assert_eq!(procutil_title::read_process_title()?, "worker: idle");
//! ```

pub mod buffer;
pub mod mm_map;
pub mod stat;
pub mod title;

pub use buffer::{TitleBuffer, strlcpy};
pub use mm_map::MmMap;
pub use stat::StatLayout;
pub use title::{ProcTitle, StatSource, read_process_title, set_process_title};
