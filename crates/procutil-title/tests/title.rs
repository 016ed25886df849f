//! Process title rewriting against the running kernel
//!
//! Everything runs in one test: the argument region is process-wide, so
//! parallel tests would observe each other's titles. Skips when the kernel
//! lacks PR_SET_MM_MAP or refuses it for this process.

use std::io::Write;

use nix::errno::Errno;
use procutil_core::{KernelCapabilities, ProcError};
use procutil_title::{ProcTitle, StatSource, read_process_title, set_process_title};

fn supported(result: &Result<(), ProcError>) -> bool {
    match result {
        Ok(()) => true,
        Err(ProcError::Os(Errno::EPERM | Errno::EINVAL | Errno::EACCES | Errno::ENOSYS)) => {
            eprintln!("PR_SET_MM_MAP unavailable: {:?}, skipping", result);
            false
        }
        Err(e) => panic!("unexpected error: {}", e),
    }
}

#[test]
fn title_follows_each_set() {
    if !KernelCapabilities::detect().has_mm_map {
        eprintln!("PR_SET_MM_MAP not compiled in, skipping");
        return;
    }

    let long = "procutil-test: a deliberately long process title that outgrows argv";
    if !supported(&set_process_title(long)) {
        return;
    }
    assert_eq!(read_process_title().unwrap(), long);

    // Shorter title must not leave any bytes of the longer one behind
    set_process_title("short").unwrap();
    let raw = std::fs::read("/proc/self/cmdline").unwrap();
    assert_eq!(raw, b"short\0");

    set_process_title("").unwrap();
    assert_eq!(read_process_title().unwrap(), "");

    set_process_title("procutil-test: again").unwrap();
    assert_eq!(read_process_title().unwrap(), "procutil-test: again");

    // A private instance replaces the title the same way
    let mut title = ProcTitle::new();
    title.set("procutil-test: private").unwrap();
    assert_eq!(title.current(), Some(&b"procutil-test: private"[..]));
    assert_eq!(read_process_title().unwrap(), "procutil-test: private");

    // Discovery failure leaves the published title untouched
    let mut bad_stat = tempfile::NamedTempFile::new().unwrap();
    writeln!(bad_stat, "4321 (procutil) R 1 1 1").unwrap();
    title.set_source(StatSource::File(bad_stat.path().to_path_buf()));

    let err = title.set("procutil-test: must not appear").unwrap_err();
    assert!(matches!(err, ProcError::Parse(_)));
    assert_eq!(title.current(), Some(&b"procutil-test: private"[..]));
    assert_eq!(read_process_title().unwrap(), "procutil-test: private");

    // A layout the kernel rejects leaves the published title untouched too
    let mut zero_stat = tempfile::NamedTempFile::new().unwrap();
    writeln!(zero_stat, "1 (procutil) {}", vec!["0"; 60].join(" ")).unwrap();
    title.set_source(StatSource::File(zero_stat.path().to_path_buf()));

    let err = title.set("procutil-test: rejected").unwrap_err();
    assert!(matches!(err, ProcError::Os(_)), "unexpected error: {}", err);
    assert_eq!(title.current(), Some(&b"procutil-test: private"[..]));
    assert_eq!(read_process_title().unwrap(), "procutil-test: private");
}
