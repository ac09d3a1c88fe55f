//! Main entry point for council-pty.
//!
//! Sets up file logging, runs the wrapped command and exits with its code.
//! Spawn and relay faults are not handled here: they bubble out of `main`.

use anyhow::Result;
use council_pty::utils;
use council_pty::{run_stdio, NativePtySpawner, RunnerEnv};

fn main() -> Result<()> {
    let log_guard = utils::logger::init_logging();

    let code = run_stdio(
        std::env::args().collect(),
        &RunnerEnv::from_env(),
        &NativePtySpawner::from_terminal(),
    )?;

    // process::exit skips destructors; flush the log writer first
    drop(log_guard);
    std::process::exit(code)
}
