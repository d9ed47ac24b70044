//! Report output
//!
//! Text mode streams one line per target as samples arrive, followed by a
//! summary line. JSON mode collects everything and writes a single document
//! when the run finishes. Fatal diagnostics are always a single text line.

use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};
use crate::format::format_duration;
use crate::stats::{BenchmarkResult, SampleSet, SAMPLE_COUNT};

/// Output format for benchmark reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// Single JSON document for machine parsing
    Json,
}

/// A benchmarked target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTarget {
    pub name: String,
    pub loop_count: u64,
    /// Per-iteration estimates in measurement order (ms)
    pub samples_ms: Vec<f64>,
    pub mean_ms: f64,
    pub standard_deviation_ms: f64,
    /// Formatted mean, as printed in text mode
    pub mean: String,
    /// Formatted standard deviation, as printed in text mode
    pub standard_deviation: String,
}

/// A non-fatal error encountered during the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonError {
    pub target: String,
    pub phase: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub samples_per_target: usize,
    pub calibration_floor_ms: u64,
    pub targets: Vec<JsonTarget>,
    pub errors: Vec<JsonError>,
}

/// Line-oriented output sink
pub struct Reporter {
    out: Box<dyn Write>,
    format: OutputFormat,
    /// A target line has been started and not yet terminated
    line_open: bool,
    /// Label of the target being measured, between `begin_target` and `finish_target`
    current: Option<String>,
    report: JsonReport,
}

impl Reporter {
    pub fn new(out: Box<dyn Write>, format: OutputFormat, calibration_floor_ms: u64) -> Self {
        Self {
            out,
            format,
            line_open: false,
            current: None,
            report: JsonReport {
                samples_per_target: SAMPLE_COUNT,
                calibration_floor_ms,
                targets: Vec::new(),
                errors: Vec::new(),
            },
        }
    }

    pub fn stdout(format: OutputFormat, calibration_floor_ms: u64) -> Self {
        Self::new(Box::new(std::io::stdout()), format, calibration_floor_ms)
    }

    pub fn header(&mut self) -> HarnessResult<()> {
        if self.format == OutputFormat::Text {
            let floor = self.report.calibration_floor_ms;
            writeln!(
                self.out,
                "Running {} samples per target (calibration floor {}ms)...\n",
                SAMPLE_COUNT, floor
            )
            .map_err(output_error)?;
        }
        Ok(())
    }

    pub fn begin_target(&mut self, label: &str) -> HarnessResult<()> {
        self.current = Some(label.to_string());
        if self.format == OutputFormat::Text {
            self.close_line()?;
            self.open_line()?;
        }
        Ok(())
    }

    /// Live report of one sample (ms per iteration)
    ///
    /// If an error line interrupted the target, the sample line is reopened
    /// under the target's label.
    pub fn sample(&mut self, per_iteration_ms: f64) -> HarnessResult<()> {
        if self.format == OutputFormat::Text {
            if !self.line_open {
                self.open_line()?;
            }
            write!(self.out, " {}", format_duration(per_iteration_ms)).map_err(output_error)?;
            self.out.flush().map_err(output_error)?;
        }
        Ok(())
    }

    pub fn finish_target(
        &mut self,
        label: &str,
        loop_count: u64,
        samples: &SampleSet,
        result: &BenchmarkResult,
    ) -> HarnessResult<()> {
        let mean = format_duration(result.mean);
        let standard_deviation = format_duration(result.standard_deviation);
        self.current = None;

        match self.format {
            OutputFormat::Text => {
                self.close_line()?;
                writeln!(self.out, "-> Mean: {} SD: {}", mean, standard_deviation)
                    .map_err(output_error)?;
            }
            OutputFormat::Json => self.report.targets.push(JsonTarget {
                name: label.to_string(),
                loop_count,
                samples_ms: samples.as_slice().to_vec(),
                mean_ms: result.mean,
                standard_deviation_ms: result.standard_deviation,
                mean,
                standard_deviation,
            }),
        }
        Ok(())
    }

    /// Report a non-fatal error against the target it belongs to
    pub fn error(&mut self, label: &str, err: &HarnessError) -> HarnessResult<()> {
        match self.format {
            OutputFormat::Text => {
                self.close_line()?;
                writeln!(self.out, "    Error [{}] {}: {}", err.phase(), label, err)
                    .map_err(output_error)?;
            }
            OutputFormat::Json => self.report.errors.push(JsonError {
                target: label.to_string(),
                phase: err.phase().to_string(),
                message: err.to_string(),
            }),
        }
        Ok(())
    }

    /// Single diagnostic line for an error that stops the run
    pub fn fatal(&mut self, err: &HarnessError) -> HarnessResult<()> {
        self.close_line()?;
        writeln!(self.out, "Fatal: {} {}", err.phase(), err).map_err(output_error)?;
        self.out.flush().map_err(output_error)
    }

    /// Flush remaining output; JSON mode writes its document here
    pub fn finish(&mut self) -> HarnessResult<()> {
        self.close_line()?;
        if self.format == OutputFormat::Json {
            let json = serde_json::to_string_pretty(&self.report)
                .map_err(|e| HarnessError::Output(e.to_string()))?;
            writeln!(self.out, "{}", json).map_err(output_error)?;
        }
        self.out.flush().map_err(output_error)
    }

    pub fn json_report(&self) -> &JsonReport {
        &self.report
    }

    fn open_line(&mut self) -> HarnessResult<()> {
        if let Some(label) = &self.current {
            write!(self.out, "{}:", label).map_err(output_error)?;
            self.out.flush().map_err(output_error)?;
            self.line_open = true;
        }
        Ok(())
    }

    fn close_line(&mut self) -> HarnessResult<()> {
        if self.line_open {
            writeln!(self.out).map_err(output_error)?;
            self.line_open = false;
        }
        Ok(())
    }
}

fn output_error(err: std::io::Error) -> HarnessError {
    HarnessError::Output(err.to_string())
}
