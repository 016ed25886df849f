use console::style;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Initialize logger.
///
/// `--verbose` only picks the default filter (`debug` instead of `warn`);
/// a set RUST_LOG always wins. Each line carries the emitting module path
/// so syscall traces from the procutil crates can be told apart.
pub fn init_logger(verbose: bool) {
    let env = Env::default().filter_or("RUST_LOG", if verbose { "debug" } else { "warn" });

    Builder::from_env(env)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => format!("{}", style("ERROR").red().bold()),
                Level::Warn => format!("{}", style("WARN ").yellow().bold()),
                Level::Info => format!("{}", style("INFO ").green()),
                Level::Debug => format!("{}", style("DEBUG").cyan()),
                Level::Trace => format!("{}", style("TRACE").dim()),
            };
            writeln!(buf, "{} [{}] {}", level, record.target(), record.args())
        })
        .init();
}
