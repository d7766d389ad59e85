//! Logging setup for host applications.
//!
//! The engine logs through the `log` facade; this module wires up the
//! `env_logger` backend for binaries and tests that want output. Level
//! selection, in priority order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `quiet` (errors only) or `verbose` (debug/trace)
//! 3. Default: info

use env_logger::Builder;
use log::LevelFilter;
use std::env;

/// Initialize the logging subsystem.
///
/// Call at most once per process; later calls are ignored so tests can
/// invoke it freely.
///
/// * `verbose` - verbosity count (0=info, 1=debug, 2+=trace)
/// * `quiet` - errors only (overridden by `RUST_LOG`)
pub fn init(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    // try_init so repeated calls (e.g. across tests) are harmless.
    let _ = builder.try_init();
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
