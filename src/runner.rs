//! Runs one command under a pty and relays its output.
//!
//! The flow is strictly sequential: open the capture file, spawn, type the
//! prompt line if there is one, pump output until end-of-file, wait for the
//! exit status. The capture file is closed on every path out of [`run`].

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::invocation::{Invocation, RunnerEnv};
use crate::pty::PtySpawner;
use crate::relay::{pump, CaptureFile, Tee};

/// Exit code for a missing command.
pub const USAGE_EXIT_CODE: i32 = 2;

pub const USAGE: &str = "Usage: council-pty <command> [args...]";

/// Parses `argv` and runs the command, writing output to `stdout`.
///
/// A missing command prints the usage line to `stderr` and yields
/// [`USAGE_EXIT_CODE`] without spawning anything.
pub fn run_cli<I>(
    argv: I,
    env: &RunnerEnv,
    spawner: &dyn PtySpawner,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<i32>
where
    I: IntoIterator<Item = String>,
{
    match Invocation::parse(argv, env) {
        Some(invocation) => run(&invocation, spawner, stdout),
        None => {
            writeln!(stderr, "{}", USAGE).context("Failed to print usage")?;
            Ok(USAGE_EXIT_CODE)
        }
    }
}

/// Runs `invocation` to completion and returns the exit code to report.
///
/// A child without an exit code (killed by a signal) reports 0.
pub fn run(
    invocation: &Invocation,
    spawner: &dyn PtySpawner,
    stdout: &mut dyn Write,
) -> Result<i32> {
    info!(
        "Running {:?} (prompt delivery: {:?}, capture: {:?})",
        invocation.command, invocation.delivery, invocation.capture_path
    );

    let mut capture = invocation
        .capture_path
        .as_deref()
        .map(CaptureFile::create)
        .transpose()?;

    let outcome = relay_child(invocation, spawner, stdout, capture.as_mut());

    let closed = match capture.as_mut() {
        Some(capture) => capture
            .close()
            .with_context(|| format!("Failed to close capture file {}", capture.path().display())),
        None => Ok(()),
    };

    let status = outcome?;
    closed?;

    let code = status.unwrap_or_else(|| {
        warn!("No exit status available, reporting 0");
        0
    });
    info!("Child finished with exit code {}", code);
    Ok(code)
}

fn relay_child(
    invocation: &Invocation,
    spawner: &dyn PtySpawner,
    stdout: &mut dyn Write,
    capture: Option<&mut CaptureFile>,
) -> Result<Option<i32>> {
    let mut session = spawner
        .spawn(&invocation.command)
        .with_context(|| format!("Failed to start '{}'", invocation.program()))?;

    if let Some(line) = invocation.input_line() {
        session
            .send_line(line)
            .context("Failed to send prompt to child")?;
    }

    // Flush per chunk either way so prompts without a newline show up
    let mut sinks: Vec<&mut dyn Write> = Vec::with_capacity(2);
    sinks.push(stdout);
    if let Some(capture) = capture {
        sinks.push(capture);
    }
    let mut tee = Tee::new(sinks);
    let relayed = pump(session.as_mut(), &mut tee)?;
    info!("Relayed {} bytes to {} sink(s)", relayed, tee.len());

    session.wait()
}

/// Runs with the process's real stdout and stderr.
pub fn run_stdio(argv: Vec<String>, env: &RunnerEnv, spawner: &dyn PtySpawner) -> Result<i32> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    run_cli(argv, env, spawner, &mut stdout.lock(), &mut stderr.lock())
}
