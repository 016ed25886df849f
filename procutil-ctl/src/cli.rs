use std::str::FromStr;

use clap::{Parser, Subcommand};
use nix::sys::signal::Signal;

#[derive(Parser)]
#[command(name = "procutil-ctl")]
#[command(version, about = "Probe, signal, wait for and retitle Linux processes", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Kernel feature check
    procutil-ctl check

    # Race-free liveness probe and signal delivery through a pidfd
    procutil-ctl alive 1234
    procutil-ctl signal 1234 TERM

    # Run a program and report how it terminated
    procutil-ctl run -- /bin/sh -c 'exit 3'
    procutil-ctl run --title 'supervisor: waiting' -- sleep 5

    # Retitle this process and keep it around for inspection
    procutil-ctl title 'hello from procutil' --hold 30
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report which kernel features are available
    Check,

    /// Check whether a process is alive using a pidfd
    Alive {
        /// Process ID to probe
        pid: i32,
    },

    /// Send a signal to a process through a pidfd
    Signal {
        /// Process ID to signal
        pid: i32,

        /// Signal name (TERM, SIGKILL) or number; 0 only probes
        #[arg(value_parser = parse_signal)]
        signal: SignalArg,
    },

    /// Run a program, wait for it and report its termination status
    Run {
        /// Title to show for this process while waiting
        #[arg(short, long, value_name = "TITLE")]
        title: Option<String>,

        /// Working directory of the program
        #[arg(long, value_name = "DIR")]
        cwd: Option<String>,

        /// Program and its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Set the title of this process and print what the kernel reports
    Title {
        /// New process title
        title: String,

        /// Keep running for this many seconds afterwards
        #[arg(long, value_name = "SECONDS")]
        hold: Option<u64>,
    },
}

/// A signal, or `None` for the signal-0 probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalArg(pub Option<Signal>);

pub fn parse_signal(value: &str) -> Result<SignalArg, String> {
    if let Ok(number) = value.parse::<i32>() {
        if number == 0 {
            return Ok(SignalArg(None));
        }
        return Signal::try_from(number)
            .map(|s| SignalArg(Some(s)))
            .map_err(|_| format!("unknown signal number: {}", number));
    }

    let upper = value.to_ascii_uppercase();
    let name = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{}", upper)
    };
    Signal::from_str(&name)
        .map(|s| SignalArg(Some(s)))
        .map_err(|_| format!("unknown signal: {}", value))
}
