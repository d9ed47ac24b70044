//! Error type for the benchmark harness
//!
//! Errors fall into two tiers. Fatal errors mean no target can ever be
//! benchmarked (no environment, no runtime, no module), so the run stops after
//! a single diagnostic line. Everything else is reported against the function
//! or phase that failed and the run moves on to the next target.

use thiserror::Error;

/// Result alias used throughout the crate
pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("failed to read module {path}: {message}")]
    ModuleRead { path: String, message: String },

    #[error("failed to write report: {0}")]
    Output(String),

    #[error("{0}")]
    EnvironmentCreation(String),

    #[error("{0}")]
    RuntimeCreation(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Load(String),

    #[error("{message}")]
    Compile { function: String, message: String },

    #[error("{message}")]
    Start { function: String, message: String },

    #[error("{message}")]
    Call { function: String, message: String },

    #[error("too fast to calibrate: {elapsed_ms}ms after {loop_count} iterations")]
    CalibrationExhausted {
        target: String,
        loop_count: u64,
        elapsed_ms: u64,
    },
}

impl HarnessError {
    /// Fatal errors abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HarnessError::Config(_)
                | HarnessError::ModuleRead { .. }
                | HarnessError::Output(_)
                | HarnessError::EnvironmentCreation(_)
                | HarnessError::RuntimeCreation(_)
                | HarnessError::Parse(_)
                | HarnessError::Load(_)
        )
    }

    /// Phase label used in report lines
    ///
    /// Fatal phases mirror the collaborator operation that failed, non-fatal
    /// phases name the benchmarking step that was skipped.
    pub fn phase(&self) -> &'static str {
        match self {
            HarnessError::Config(_) => "Config",
            HarnessError::ModuleRead { .. } => "ReadModule",
            HarnessError::Output(_) => "Output",
            HarnessError::EnvironmentCreation(_) => "NewEnvironment",
            HarnessError::RuntimeCreation(_) => "NewRuntime",
            HarnessError::Parse(_) => "ParseModule",
            HarnessError::Load(_) => "LoadModule",
            HarnessError::Compile { .. } => "compile",
            HarnessError::Start { .. } => "start",
            HarnessError::Call { .. } => "call",
            HarnessError::CalibrationExhausted { .. } => "calibrate",
        }
    }
}
