use std::thread;
use std::time::Duration;

use console::style;
use log::info;
use nix::unistd::Pid;
use procutil::{KernelCapabilities, PidFd, Result, read_process_title, set_process_title};

use crate::cli::SignalArg;

pub fn check_requirements() {
    info!("Checking kernel features");
    println!("Checking kernel features...\n");

    let caps = KernelCapabilities::detect();
    println!("{}", caps.summary());

    if !caps.has_pidfd {
        println!("\n`alive` and `signal` need pidfds (Linux 5.3+)");
    }
    if !caps.has_mm_map {
        println!("\n`title` needs PR_SET_MM_MAP (Linux 3.18+ with CONFIG_CHECKPOINT_RESTORE)");
    }
}

/// Probe `pid`; prints and returns whether it is alive
pub fn probe_alive(pid: i32) -> Result<bool> {
    let alive = match PidFd::open(Pid::from_raw(pid)) {
        Ok(handle) => handle.is_alive(),
        Err(e) if e.is_no_such_process() => false,
        Err(e) => return Err(e),
    };

    if alive {
        println!("{} process {} is alive", style("[ok]").green(), pid);
    } else {
        println!("{} process {} is gone", style("[--]").red(), pid);
    }
    Ok(alive)
}

pub fn send_signal(pid: i32, signal: SignalArg) -> Result<()> {
    let handle = PidFd::open(Pid::from_raw(pid))?;
    handle.send_signal(signal.0, None, 0)?;

    match signal.0 {
        Some(sig) => println!("Sent {} to process {}", sig, pid),
        None => println!("Process {} accepts signals", pid),
    }
    Ok(())
}

pub fn retitle(title: &str, hold: Option<u64>) -> Result<()> {
    set_process_title(title)?;
    println!("Title now: {:?}", read_process_title()?);

    if let Some(seconds) = hold {
        println!(
            "Holding for {}s, inspect with {}",
            seconds,
            style(format!("cat /proc/{}/cmdline", std::process::id())).cyan()
        );
        thread::sleep(Duration::from_secs(seconds));
    }
    Ok(())
}
