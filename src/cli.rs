//! CLI argument parsing for wasmbench

use std::path::PathBuf;

use clap::Parser;

use crate::config::{HarnessConfig, StartPolicy};
use crate::error::HarnessResult;
use crate::harness::ModuleSource;
use crate::report::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wasmbench")]
#[command(version)]
#[command(about = "Benchmark module exports and native math routines with a millisecond clock", long_about = None)]
pub struct Cli {
    /// Module to benchmark (binary or text format); the embedded demo module if omitted
    #[arg(value_name = "MODULE")]
    pub module: Option<PathBuf>,

    /// Load harness configuration from a TOML file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Calibration floor in milliseconds
    #[arg(long = "floor-ms", value_name = "MS")]
    pub floor_ms: Option<u64>,

    /// Maximum loop-count doublings before a target is reported as too fast
    #[arg(long = "max-doublings", value_name = "N")]
    pub max_doublings: Option<u32>,

    /// When to request the module start function
    #[arg(long = "start-policy", value_enum)]
    pub start_policy: Option<StartPolicy>,

    /// Skip module exports, benchmark native routines only
    #[arg(long = "skip-wasm")]
    pub skip_wasm: bool,

    /// Skip the native routines
    #[arg(long = "no-native")]
    pub no_native: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Build the run configuration: file (if any), then flag overrides
    pub fn harness_config(&self) -> HarnessResult<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_file(path)?,
            None => HarnessConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut HarnessConfig) {
        if let Some(floor) = self.floor_ms {
            config.calibration_floor_ms = floor;
        }
        if let Some(max_doublings) = self.max_doublings {
            config.max_doublings = max_doublings;
        }
        if let Some(policy) = self.start_policy {
            config.start_policy = policy;
        }
        if self.skip_wasm {
            config.wasm = false;
        }
        if self.no_native {
            config.native = false;
        }
    }

    pub fn module_source(&self) -> ModuleSource {
        match &self.module {
            Some(path) => ModuleSource::Path(path.clone()),
            None => ModuleSource::Embedded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wasmbench"]);
        assert!(cli.module.is_none());
        assert!(!cli.skip_wasm);
        assert!(!cli.no_native);
        assert!(!cli.debug);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.module_source(), ModuleSource::Embedded);
        assert_eq!(cli.harness_config().unwrap(), HarnessConfig::default());
    }

    #[test]
    fn test_cli_module_path() {
        let cli = Cli::parse_from(["wasmbench", "bench.wasm"]);
        assert_eq!(
            cli.module_source(),
            ModuleSource::Path(PathBuf::from("bench.wasm"))
        );
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "wasmbench",
            "--floor-ms",
            "5",
            "--max-doublings",
            "12",
            "--start-policy",
            "once-per-module",
            "--skip-wasm",
        ]);
        let config = cli.harness_config().unwrap();
        assert_eq!(config.calibration_floor_ms, 5);
        assert_eq!(config.max_doublings, 12);
        assert_eq!(config.start_policy, StartPolicy::OncePerModule);
        assert!(!config.wasm);
        assert!(config.native);
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["wasmbench", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["wasmbench", "--format", "csv"]).is_err());
    }

    #[test]
    fn test_cli_flags_override_file() {
        let mut config = HarnessConfig {
            calibration_floor_ms: 250,
            ..HarnessConfig::default()
        };
        let cli = Cli::parse_from(["wasmbench", "--no-native"]);
        cli.apply_to(&mut config);
        assert_eq!(config.calibration_floor_ms, 250);
        assert!(!config.native);
    }

    #[test]
    fn test_cli_missing_config_file() {
        let cli = Cli::parse_from(["wasmbench", "--config", "/nonexistent/wasmbench.toml"]);
        assert!(cli.harness_config().is_err());
    }
}
