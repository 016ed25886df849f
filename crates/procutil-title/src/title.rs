//! Process title state and the discover / reallocate / republish sequence

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::debug;
use procutil_core::{ProcError, Result};

use crate::buffer::TitleBuffer;
use crate::mm_map::{MmMap, current_brk};
use crate::stat::{SELF_STAT, StatLayout};

/// Where the memory layout is discovered from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatSource {
    /// /proc/self/stat
    #[default]
    SelfStat,
    /// A stat-formatted file, e.g. a captured or synthetic line
    File(PathBuf),
}

impl StatSource {
    fn path(&self) -> &Path {
        match self {
            StatSource::SelfStat => Path::new(SELF_STAT),
            StatSource::File(path) => path,
        }
    }
}

/// Owner of the buffer backing the published process title.
///
/// Once the kernel has been pointed at a buffer that buffer is never freed:
/// replacing the title releases the previous one only after the new layout
/// is accepted, and dropping a `ProcTitle` leaks the current one.
///
/// Not synchronised. Concurrent `set` calls on different instances race on
/// the single argument region of the process.
#[derive(Debug, Default)]
pub struct ProcTitle {
    buffer: Option<TitleBuffer>,
    source: StatSource,
}

impl ProcTitle {
    pub const fn new() -> Self {
        Self {
            buffer: None,
            source: StatSource::SelfStat,
        }
    }

    pub fn with_source(source: StatSource) -> Self {
        Self {
            buffer: None,
            source,
        }
    }

    pub fn set_source(&mut self, source: StatSource) {
        self.source = source;
    }

    /// Title currently published through this instance
    pub fn current(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(TitleBuffer::as_bytes)
    }

    /// Replace the process title with `title`.
    ///
    /// On any failure the previously published title stays in place.
    pub fn set(&mut self, title: &str) -> Result<()> {
        if title.as_bytes().contains(&0) {
            return Err(ProcError::InvalidArgument(format!(
                "title contains a NUL byte: {:?}",
                title
            )));
        }

        let layout = StatLayout::read_from(self.source.path())?;
        debug!("Discovered memory layout: {:?}", layout);

        let len = title.len() + 1;
        let mut buffer = TitleBuffer::try_with_capacity(len)?;

        let (arg_start, arg_end) = buffer.addr_range();
        MmMap::with_args(&layout, current_brk(), arg_start, arg_end).publish()?;

        // Only now is the kernel reading from the new buffer
        buffer.copy_truncating(title.as_bytes());
        self.buffer = Some(buffer);
        debug!("Process title set to {:?}", title);
        Ok(())
    }
}

impl Drop for ProcTitle {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.leak();
        }
    }
}

static PROCESS_TITLE: Mutex<ProcTitle> = Mutex::new(ProcTitle::new());

/// Set the title of the calling process through the process-wide state
pub fn set_process_title(title: &str) -> Result<()> {
    PROCESS_TITLE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set(title)
}

/// Command line of the calling process as the kernel reports it, up to the
/// first NUL
pub fn read_process_title() -> Result<String> {
    let cmdline = fs::read("/proc/self/cmdline")
        .map_err(|e| ProcError::Parse(format!("Failed to read /proc/self/cmdline: {}", e)))?;
    let end = cmdline.iter().position(|&b| b == 0).unwrap_or(cmdline.len());
    Ok(String::from_utf8_lossy(&cmdline[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn new_title_has_nothing_published() {
        let title = ProcTitle::new();
        assert!(title.current().is_none());
    }

    #[test]
    fn malformed_stat_fails_without_publishing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1234 (bash) S 1 2 3").unwrap();

        let mut title = ProcTitle::with_source(StatSource::File(file.path().to_path_buf()));
        let before = read_process_title().unwrap();

        let err = title.set("never published").unwrap_err();
        assert!(matches!(err, ProcError::Parse(_)));
        assert!(title.current().is_none());
        assert_eq!(read_process_title().unwrap(), before);
    }

    #[test]
    fn missing_paren_fails_with_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1234 bash S {}", vec!["0"; 60].join(" ")).unwrap();

        let mut title = ProcTitle::with_source(StatSource::File(file.path().to_path_buf()));
        assert!(matches!(title.set("x"), Err(ProcError::Parse(_))));
    }

    #[test]
    fn missing_stat_file_fails_with_parse_error() {
        let mut title = ProcTitle::with_source(StatSource::File(PathBuf::from("/nonexistent")));
        assert!(matches!(title.set("x"), Err(ProcError::Parse(_))));
    }

    #[test]
    fn interior_nul_is_rejected() {
        let mut title = ProcTitle::new();
        assert!(matches!(
            title.set("a\0b"),
            Err(ProcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn read_process_title_returns_argv0() {
        let title = read_process_title().unwrap();
        assert!(!title.is_empty());
    }
}
