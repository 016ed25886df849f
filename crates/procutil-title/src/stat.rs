//! Memory-layout fields of /proc/<pid>/stat
//!
//! Field numbering follows proc(5): 26-28 are startcode, endcode and
//! startstack, 45-51 are start_data through env_end.

use std::fs;
use std::path::Path;

use procutil_core::{ProcError, Result};

/// Spaces between the closing parenthesis of `comm` and field 26
const FIELDS_TO_CODE: usize = 24;
/// Spaces between field 26 and field 45
const FIELDS_TO_DATA: usize = 19;

pub const SELF_STAT: &str = "/proc/self/stat";

/// Snapshot of the memory-layout boundaries reported by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatLayout {
    pub start_code: u64,
    pub end_code: u64,
    pub start_stack: u64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_brk: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub env_start: u64,
    pub env_end: u64,
}

impl StatLayout {
    /// Read the calling process's layout
    pub fn read_self() -> Result<Self> {
        Self::read_from(Path::new(SELF_STAT))
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let line = fs::read_to_string(path).map_err(|e| {
            ProcError::Parse(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&line)
    }

    /// Parse one stat line.
    ///
    /// `comm` may itself contain spaces and parentheses, so fields are
    /// counted from the last `)` in the line.
    pub fn parse(line: &str) -> Result<Self> {
        let bytes = line.as_bytes();
        let comm_end = line
            .rfind(')')
            .ok_or_else(|| ProcError::Parse("missing ')' after executable name".to_string()))?;

        let code_pos = skip_fields(bytes, comm_end, FIELDS_TO_CODE)
            .ok_or_else(|| ProcError::Parse("too few fields before startcode".to_string()))?;
        let [start_code, end_code, start_stack] =
            parse_fields::<3>(&line[code_pos..], "startcode")?;

        let data_pos = skip_fields(bytes, code_pos, FIELDS_TO_DATA)
            .ok_or_else(|| ProcError::Parse("too few fields before start_data".to_string()))?;
        let [start_data, end_data, start_brk, arg_start, arg_end, env_start, env_end] =
            parse_fields::<7>(&line[data_pos..], "start_data")?;

        Ok(Self {
            start_code,
            end_code,
            start_stack,
            start_data,
            end_data,
            start_brk,
            arg_start,
            arg_end,
            env_start,
            env_end,
        })
    }
}

/// Advance `pos` over `count` single spaces, returning the index of the last one
fn skip_fields(bytes: &[u8], mut pos: usize, count: usize) -> Option<usize> {
    for _ in 0..count {
        let rest = bytes.get(pos + 1..)?;
        pos += 1 + rest.iter().position(|&b| b == b' ')?;
    }
    Some(pos)
}

fn parse_fields<const N: usize>(rest: &str, first: &str) -> Result<[u64; N]> {
    let mut values = [0u64; N];
    let mut fields = rest.split_ascii_whitespace();
    for (i, slot) in values.iter_mut().enumerate() {
        let field = fields.next().ok_or_else(|| {
            ProcError::Parse(format!("stat line ends {} fields after {}", i, first))
        })?;
        *slot = field.parse().map_err(|_| {
            ProcError::Parse(format!("invalid number {:?} {} fields after {}", field, i, first))
        })?;
    }
    Ok(values)
}
