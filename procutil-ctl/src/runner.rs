use console::style;
use log::{info, warn};
use procutil::spawn::SpawnConfig;
use procutil::{
    ArgvList, KernelCapabilities, PidFd, Result, set_process_title, spawn_with, wait_for_exit_status,
};

pub struct RunConfig {
    pub command: Vec<String>,
    pub title: Option<String>,
    pub cwd: Option<String>,
}

/// Run the command to completion; returns a shell-style exit code
pub fn run_command(config: RunConfig) -> Result<i32> {
    let argv = ArgvList::from_strs(&config.command)?;
    let spawn_config = SpawnConfig {
        argv,
        envp: None,
        cwd: config.cwd,
    };

    let child = spawn_with(&spawn_config)?;
    info!("Started {:?} as pid {}", config.command, child);

    if let Some(title) = &config.title
        && let Err(e) = set_process_title(title)
    {
        warn!("Could not set process title: {}", e);
    }

    if KernelCapabilities::detect().has_pidfd {
        match PidFd::open(child) {
            Ok(handle) => info!("pid {} alive: {}", child, handle.is_alive()),
            Err(e) => warn!("pidfd_open({}) failed: {}", child, e),
        }
    }

    let status = wait_for_exit_status(child)?;
    if let Some(code) = status.exit_code() {
        let label = if code == 0 {
            style("exited").green()
        } else {
            style("exited").yellow()
        };
        println!("{} with code {}", label, code);
    } else if let Some(signal) = status.signal() {
        let core = if status.core_dumped() { " (core dumped)" } else { "" };
        println!("{} by {}{}", style("killed").red().bold(), signal, core);
    } else {
        println!("raw status {:#x}", status.as_raw());
    }

    Ok(status.shell_code())
}
