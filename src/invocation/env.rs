//! Environment configuration read by the runner.
//!
//! Both values are optional. An unset variable reads as an empty string,
//! and an empty string means "not requested".

/// Prompt text delivered to the spawned program.
pub const PROMPT_VAR: &str = "COUNCIL_PROMPT";
/// Path of the file that receives a copy of all output.
pub const CAPTURE_PATH_VAR: &str = "COUNCIL_CAPTURE_PATH";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerEnv {
    pub prompt: String,
    pub capture_path: String,
}

impl RunnerEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            prompt: lookup(PROMPT_VAR).unwrap_or_default(),
            capture_path: lookup(CAPTURE_PATH_VAR).unwrap_or_default(),
        }
    }
}
