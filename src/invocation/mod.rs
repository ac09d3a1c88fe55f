//! Invocation building from positional arguments and environment.
//!
//! This module turns `argv` plus the `COUNCIL_*` variables into the final
//! command line and decides how the prompt reaches the spawned program.

mod env;

pub use env::{RunnerEnv, CAPTURE_PATH_VAR, PROMPT_VAR};

use std::path::PathBuf;

/// Tokens that put the wrapped program into non-interactive print mode.
pub const PRINT_FLAGS: [&str; 2] = ["--print", "-p"];

/// How the prompt is handed to the spawned program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptDelivery {
    /// No prompt configured.
    None,
    /// Appended as the final positional argument (print mode).
    Argument,
    /// Typed into the terminal as one line after spawn.
    Line,
}

/// A fully resolved runner invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Program followed by its arguments, prompt already appended in print mode.
    pub command: Vec<String>,
    pub prompt: Option<String>,
    pub delivery: PromptDelivery,
    pub capture_path: Option<PathBuf>,
}

/// Returns true if any token in `args` is `--print` or `-p`.
pub fn has_print_flag<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter().any(|arg| PRINT_FLAGS.contains(&arg.as_ref()))
}

impl Invocation {
    /// Builds an invocation from the runner's own `argv`.
    ///
    /// The first item is the runner's name and is skipped. Returns `None`
    /// when no command follows it.
    pub fn parse<I>(argv: I, env: &RunnerEnv) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut command: Vec<String> = argv.into_iter().skip(1).collect();
        if command.is_empty() {
            return None;
        }

        let print_mode = has_print_flag(&command);
        let prompt = (!env.prompt.is_empty()).then(|| env.prompt.clone());

        let delivery = match (&prompt, print_mode) {
            (None, _) => PromptDelivery::None,
            (Some(prompt), true) => {
                command.push(prompt.clone());
                PromptDelivery::Argument
            }
            (Some(_), false) => PromptDelivery::Line,
        };

        let capture_path =
            (!env.capture_path.is_empty()).then(|| PathBuf::from(&env.capture_path));

        Some(Self {
            command,
            prompt,
            delivery,
            capture_path,
        })
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// The line to type into the terminal, if the prompt goes over stdin.
    pub fn input_line(&self) -> Option<&str> {
        match self.delivery {
            PromptDelivery::Line => self.prompt.as_deref(),
            _ => None,
        }
    }
}
