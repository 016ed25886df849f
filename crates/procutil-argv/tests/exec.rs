//! End-to-end: argument vectors built with ArgvList drive a real execve(2)

use nix::unistd::{ForkResult, Pid, fork};
use procutil_argv::ArgvList;
use procutil_wait::{wait_for_exit, wait_for_exit_status};

/// Fork and exec `argv[0]`; pointer arrays are built before forking so the
/// child only calls async-signal-safe functions.
fn spawn(argv: &ArgvList, envp: &ArgvList) -> Pid {
    let argv_ptrs = argv.as_ptrs();
    let envp_ptrs = envp.as_ptrs();

    match unsafe { fork() } {
        Ok(ForkResult::Child) => unsafe {
            libc::execve(argv_ptrs[0], argv_ptrs.as_ptr(), envp_ptrs.as_ptr());
            libc::_exit(127)
        },
        Ok(ForkResult::Parent { child }) => child,
        Err(e) => panic!("fork failed: {}", e),
    }
}

#[test]
fn exec_with_built_argv_succeeds() {
    let argv = ArgvList::from_strs(["/bin/sh", "-c", "exit 0"]).unwrap();
    let envp = ArgvList::new();
    let child = spawn(&argv, &envp);
    assert!(wait_for_exit(child).is_ok());
}

#[test]
fn exec_sees_every_argument() {
    let mut argv = ArgvList::new();
    for arg in ["/bin/sh", "-c", "[ \"$1\" = one ] && [ \"$2\" = two ] && exit 9", "sh", "one"] {
        argv.push_str(arg).unwrap();
    }
    argv.push_argument(c"two").unwrap();

    let child = spawn(&argv, &ArgvList::new());
    let status = wait_for_exit_status(child).unwrap();
    assert_eq!(status.exit_code(), Some(9));
}

#[test]
fn exec_sees_environment() {
    let argv = ArgvList::from_strs(["/bin/sh", "-c", "[ \"$PROCUTIL_TEST\" = yes ]"]).unwrap();
    let envp = ArgvList::from_strs(["PROCUTIL_TEST=yes"]).unwrap();
    let child = spawn(&argv, &envp);
    assert!(wait_for_exit(child).is_ok());
}

#[test]
fn failing_exec_is_reported_as_failure() {
    let argv = ArgvList::from_strs(["/nonexistent/procutil-binary"]).unwrap();
    let child = spawn(&argv, &ArgvList::new());
    let status = wait_for_exit_status(child).unwrap();
    assert_eq!(status.exit_code(), Some(127));
}
