//! procutil-ctl - drive procutil process primitives from the shell

mod cli;
mod commands;
mod logging;
mod runner;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{check_requirements, probe_alive, retitle, send_signal};
use console::style;
use runner::{RunConfig, run_command};

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Check => {
            check_requirements();
            Ok(0)
        }
        Commands::Alive { pid } => probe_alive(pid).map(|alive| if alive { 0 } else { 1 }),
        Commands::Signal { pid, signal } => send_signal(pid, signal).map(|_| 0),
        Commands::Run {
            title,
            cwd,
            command,
        } => run_command(RunConfig {
            command,
            title,
            cwd,
        }),
        Commands::Title { title, hold } => retitle(&title, hold).map(|_| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_requirements_runs() {
        check_requirements();
    }

    #[test]
    fn probe_self_is_alive() {
        if !procutil::KernelCapabilities::detect().has_pidfd {
            return;
        }
        assert!(probe_alive(std::process::id() as i32).unwrap());
    }

    #[test]
    fn signal_zero_probes_self() {
        if !procutil::KernelCapabilities::detect().has_pidfd {
            return;
        }
        send_signal(std::process::id() as i32, cli::SignalArg(None)).unwrap();
    }
}
