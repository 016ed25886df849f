//! fork + execve driven by NULL-terminated argument lists

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use log::debug;
use nix::unistd::{AccessFlags, ForkResult, Pid, access, fork};
use procutil_argv::ArgvList;
use procutil_core::{ProcError, Result};

const DEFAULT_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Exit code of a child whose execve(2) failed
pub const EXEC_FAILED: i32 = 127;

/// What to run in the child
#[derive(Debug, Clone, Default)]
pub struct SpawnConfig {
    /// Argument vector; `argv[0]` names the program
    pub argv: ArgvList,
    /// Environment as `KEY=VALUE` entries, `None` to inherit ours
    pub envp: Option<ArgvList>,
    /// Working directory for the child
    pub cwd: Option<String>,
}

impl SpawnConfig {
    pub fn new(argv: ArgvList) -> Self {
        Self {
            argv,
            ..Default::default()
        }
    }
}

/// Start `argv[0]` with `argv` and `envp`, returning the child's pid
pub fn spawn(argv: &ArgvList, envp: &ArgvList) -> Result<Pid> {
    spawn_with(&SpawnConfig {
        argv: argv.clone(),
        envp: Some(envp.clone()),
        cwd: None,
    })
}

/// Start a child described by `config`.
///
/// Everything the child needs is prepared before forking so the child only
/// calls chdir(2), execve(2) and _exit(2). A child whose exec fails exits
/// with [`EXEC_FAILED`].
pub fn spawn_with(config: &SpawnConfig) -> Result<Pid> {
    let program = config
        .argv
        .get(0)
        .ok_or_else(|| ProcError::InvalidArgument("empty argument vector".to_string()))?;

    let envp = match &config.envp {
        Some(envp) => envp.clone(),
        None => inherited_environment()?,
    };
    let path = resolve_program_path(program.to_bytes(), &envp)?;
    let cwd = config
        .cwd
        .as_deref()
        .map(|dir| {
            CString::new(dir)
                .map_err(|_| ProcError::InvalidArgument(format!("cwd contains a NUL byte: {:?}", dir)))
        })
        .transpose()?;

    let argv_ptrs = config.argv.as_ptrs();
    let envp_ptrs = envp.as_ptrs();

    // SAFETY: the child branch restricts itself to async-signal-safe calls
    match unsafe { fork() }? {
        ForkResult::Child => unsafe {
            if let Some(cwd) = &cwd
                && libc::chdir(cwd.as_ptr()) != 0
            {
                libc::_exit(EXEC_FAILED);
            }
            libc::execve(path.as_ptr(), argv_ptrs.as_ptr(), envp_ptrs.as_ptr());
            libc::_exit(EXEC_FAILED)
        },
        ForkResult::Parent { child } => {
            debug!("Spawned {:?} as pid {}", path, child);
            Ok(child)
        }
    }
}

fn inherited_environment() -> Result<ArgvList> {
    let mut envp = ArgvList::new();
    for (key, value) in std::env::vars_os() {
        let mut entry = key.as_bytes().to_vec();
        entry.push(b'=');
        entry.extend_from_slice(value.as_bytes());
        // Entries with NUL bytes cannot come from the kernel
        if let Ok(entry) = CString::new(entry) {
            envp.push_argument(&entry)?;
        }
    }
    Ok(envp)
}

/// Resolve a program name to a path using the child's PATH
fn resolve_program_path(program: &[u8], envp: &ArgvList) -> Result<CString> {
    let as_cstring = |bytes: &[u8]| {
        CString::new(bytes).map_err(|_| ProcError::InvalidArgument("program path".to_string()))
    };

    if program.contains(&b'/') {
        return as_cstring(program);
    }

    let path_value = envp
        .iter()
        .find_map(|entry| entry.to_bytes().strip_prefix(b"PATH="))
        .unwrap_or(DEFAULT_PATH.as_bytes());

    for entry in path_value.split(|&b| b == b':') {
        let dir: &[u8] = if entry.is_empty() { b"." } else { entry };
        let candidate = Path::new(std::ffi::OsStr::from_bytes(dir))
            .join(std::ffi::OsStr::from_bytes(program));

        if access(&candidate, AccessFlags::X_OK).is_ok() {
            return as_cstring(candidate.as_os_str().as_bytes());
        }
    }

    Err(ProcError::Os(nix::errno::Errno::ENOENT))
}
