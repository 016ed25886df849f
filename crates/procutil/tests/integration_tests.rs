//! Integration tests combining spawn, pidfds and waits

use nix::sys::signal::Signal;
use procutil::{ArgvList, KernelCapabilities, PidFd, spawn, wait_for_exit, wait_for_exit_status};

fn run_sh(script: &str) -> nix::unistd::Pid {
    let argv = ArgvList::from_strs(["/bin/sh", "-c", script]).unwrap();
    spawn(&argv, &ArgvList::new()).unwrap()
}

#[test]
fn wait_for_exit_succeeds_only_on_clean_exit() {
    assert!(wait_for_exit(run_sh("exit 0")).is_ok());
    assert!(wait_for_exit(run_sh("exit 1")).is_err());
    assert!(wait_for_exit(run_sh("exit 255")).is_err());
    assert!(wait_for_exit(run_sh("kill -TERM $$")).is_err());
    assert!(wait_for_exit(run_sh("kill -KILL $$")).is_err());
}

#[test]
fn raw_status_distinguishes_termination_modes() {
    let status = wait_for_exit_status(run_sh("exit 3")).unwrap();
    assert_eq!(status.exit_code(), Some(3));
    assert!(!status.signaled());

    let status = wait_for_exit_status(run_sh("kill -TERM $$")).unwrap();
    assert_eq!(status.signal(), Some(Signal::SIGTERM));
    assert_eq!(status.exit_code(), None);
}

#[test]
fn pidfd_liveness_follows_spawned_child() {
    if !KernelCapabilities::detect().has_pidfd {
        return;
    }

    let argv = ArgvList::from_strs(["/bin/sleep", "30"]).unwrap();
    let child = spawn(&argv, &ArgvList::new()).unwrap();
    let handle = PidFd::open(child).unwrap();
    assert!(handle.is_alive());

    handle.kill(Signal::SIGKILL).unwrap();
    let status = wait_for_exit_status(child).unwrap();
    assert_eq!(status.signal(), Some(Signal::SIGKILL));

    assert!(!handle.is_alive());
    assert!(handle.kill(Signal::SIGTERM).unwrap_err().is_no_such_process());
}

#[test]
fn many_children_are_reaped_individually() {
    let children: Vec<_> = (0..8).map(|i| run_sh(&format!("exit {}", i))).collect();
    for (i, child) in children.into_iter().enumerate().rev() {
        let status = wait_for_exit_status(child).unwrap();
        assert_eq!(status.exit_code(), Some(i as i32));
    }
}
