//! Harness configuration
//!
//! Defaults reproduce the microcontroller harness: a 100ms calibration floor
//! and a fresh start-function request for every exported name. Values can be
//! loaded from a TOML file and overridden on the command line.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};
use crate::runtime::EngineOptions;

/// Iteration counts are passed to exports as `i32`, and a dual measurement
/// runs `2 * loop_count` iterations, so `loop_count` may not exceed `2^29`.
pub const MAX_DOUBLINGS_LIMIT: u32 = 29;

/// When the module start function is requested during enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StartPolicy {
    /// Request start semantics before every exported name is benchmarked;
    /// the wasmtime backend gives each export a freshly instantiated module
    #[default]
    PerExport,
    /// Request start semantics once, before the first export; every export
    /// then shares one instance and its global state
    OncePerModule,
}

/// Configuration for a benchmark run
///
/// # Example TOML
///
/// ```toml
/// calibration_floor_ms = 100
/// max_doublings = 24
/// start_policy = "per_export"
/// native = true
/// wasm = true
/// ```
///
/// # Example
/// ```
/// use wasmbench::config::HarnessConfig;
///
/// let config = HarnessConfig::default();
/// assert_eq!(config.calibration_floor_ms, 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Minimum duration a single calibration invocation must reach (ms)
    pub calibration_floor_ms: u64,

    /// Maximum number of times calibration may double the loop count before
    /// giving up on a target as too fast to calibrate
    pub max_doublings: u32,

    pub start_policy: StartPolicy,

    /// Benchmark the built-in native math routines
    pub native: bool,

    /// Benchmark module exports
    pub wasm: bool,

    /// Engine stack limit in bytes
    pub max_wasm_stack: Option<usize>,

    /// Linear memory cap in bytes
    pub memory_limit: Option<usize>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            calibration_floor_ms: 100,
            max_doublings: 24,
            start_policy: StartPolicy::PerExport,
            native: true,
            wasm: true,
            max_wasm_stack: None,
            memory_limit: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> HarnessResult<Self> {
        toml::from_str(content).map_err(|e| HarnessError::Config(e.message().to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.calibration_floor_ms == 0 {
            return Err("calibration_floor_ms must be at least 1".to_string());
        }

        if self.max_doublings == 0 || self.max_doublings > MAX_DOUBLINGS_LIMIT {
            return Err(format!(
                "max_doublings must be in [1, {}], got {}",
                MAX_DOUBLINGS_LIMIT, self.max_doublings
            ));
        }

        if !self.native && !self.wasm {
            return Err("nothing to benchmark: both native and wasm are disabled".to_string());
        }

        Ok(())
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_wasm_stack: self.max_wasm_stack,
            memory_limit: self.memory_limit,
        }
    }
}
