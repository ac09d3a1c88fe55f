//! council-pty - run a terminal program under a pty and relay its output
//!
//! This library provides the pieces behind the `council-pty` binary:
//! - Invocation building from `argv` and `COUNCIL_*` variables
//! - Pty spawning behind a swappable interface
//! - Output relay to stdout and an optional capture file
//!
//! # Example
//!
//! ```no_run
//! use council_pty::{run_stdio, NativePtySpawner, RunnerEnv};
//!
//! fn main() -> anyhow::Result<()> {
//!     let code = run_stdio(
//!         vec!["council-pty".into(), "claude".into(), "--print".into()],
//!         &RunnerEnv::from_env(),
//!         &NativePtySpawner::from_terminal(),
//!     )?;
//!     std::process::exit(code)
//! }
//! ```

pub mod invocation;
pub mod pty;
pub mod relay;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use invocation::{Invocation, PromptDelivery, RunnerEnv};
pub use pty::{NativePtySpawner, PtySession, PtySpawner};
pub use relay::{CaptureFile, Tee};
pub use runner::{run, run_cli, run_stdio, USAGE_EXIT_CODE};
