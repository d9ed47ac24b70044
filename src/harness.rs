//! Benchmark driver
//!
//! One harness context holds everything a run mutates: configuration, the
//! clock, the sponge and the reporter. The driver sets up the execution
//! environment, walks the module's exports, then the native routines, and
//! benchmarks each target in turn on the calling thread.

use std::borrow::Cow;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::clock::{Clock, MillisClock};
use crate::config::HarnessConfig;
use crate::enumerate::ModuleFunctionEnumerator;
use crate::error::{HarnessError, HarnessResult};
use crate::measure::{self, Measurement};
use crate::native;
use crate::report::{OutputFormat, Reporter};
use crate::runtime::{BoundModule, ExecutionEnvironment, WasmtimeEnvironment};
use crate::sponge::Sponge;
use crate::stats::BenchmarkResult;
use crate::target::{InvocationTarget, NativeTarget};

/// Module benchmarked when no path is given
pub const EMBEDDED_MODULE: &str = include_str!("../demos/math.wat");

/// Mutable state shared by every component for the length of a run
pub struct HarnessContext {
    pub config: HarnessConfig,
    pub clock: Box<dyn Clock>,
    pub sponge: Sponge,
    pub reporter: Reporter,
}

impl HarnessContext {
    pub fn new(config: HarnessConfig, clock: Box<dyn Clock>, reporter: Reporter) -> Self {
        Self {
            config,
            clock,
            sponge: Sponge::new(),
            reporter,
        }
    }
}

/// Where the module bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    Embedded,
    Path(PathBuf),
}

impl ModuleSource {
    pub fn bytes(&self) -> HarnessResult<Cow<'static, [u8]>> {
        match self {
            ModuleSource::Embedded => Ok(Cow::Borrowed(EMBEDDED_MODULE.as_bytes())),
            ModuleSource::Path(path) => std::fs::read(path).map(Cow::Owned).map_err(|e| {
                HarnessError::ModuleRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Benchmarked targets in report order
    pub results: Vec<(String, BenchmarkResult)>,
    /// Targets reported as failed and skipped
    pub skipped: usize,
    /// Final sponge value
    pub sponge: f64,
}

pub struct Harness {
    ctx: HarnessContext,
    summary: RunSummary,
}

impl Harness {
    pub fn new(config: HarnessConfig, clock: Box<dyn Clock>, reporter: Reporter) -> Self {
        Self {
            ctx: HarnessContext::new(config, clock, reporter),
            summary: RunSummary::default(),
        }
    }

    /// Harness reporting to stdout with the millisecond wall clock
    pub fn with_stdout(config: HarnessConfig, format: OutputFormat) -> Self {
        let reporter = Reporter::stdout(format, config.calibration_floor_ms);
        Self::new(config, Box::new(MillisClock::new()), reporter)
    }

    /// Run the whole benchmark sequence
    ///
    /// A fatal error is written as a single `Fatal:` line before it is
    /// returned; non-fatal errors are reported inline and the run continues.
    pub fn run(mut self, source: &ModuleSource) -> HarnessResult<RunSummary> {
        match self.run_inner(source) {
            Ok(()) => self.finish(),
            Err(err) => {
                self.ctx.reporter.fatal(&err)?;
                Err(err)
            }
        }
    }

    fn run_inner(&mut self, source: &ModuleSource) -> HarnessResult<()> {
        self.ctx.config.validate().map_err(HarnessError::Config)?;

        // Every fatal step happens before the header is written
        let module = if self.ctx.config.wasm {
            let environment = WasmtimeEnvironment::new(self.ctx.config.engine_options())
                .map_err(|e| HarnessError::EnvironmentCreation(e.message))?;
            let bytes = source.bytes()?;
            Some(self.load_module(&environment, &bytes)?)
        } else {
            None
        };

        self.ctx.reporter.header()?;

        if let Some(mut module) = module {
            self.benchmark_module(&mut module)?;
        }
        if self.ctx.config.native {
            self.run_native()?;
        }
        Ok(())
    }

    /// Flush the report and hand back what the run produced
    pub fn finish(mut self) -> HarnessResult<RunSummary> {
        self.ctx.reporter.finish()?;
        self.summary.sponge = self.ctx.sponge.value();
        debug!(sponge = self.summary.sponge, "run complete");
        Ok(self.summary)
    }

    /// Load and benchmark every exported function of a module
    pub fn run_module<E: ExecutionEnvironment>(
        &mut self,
        environment: &E,
        bytes: &[u8],
    ) -> HarnessResult<()> {
        let mut module = self.load_module(environment, bytes)?;
        self.benchmark_module(&mut module)
    }

    /// Create a runtime, then parse and load the module into it
    pub fn load_module<E: ExecutionEnvironment>(
        &self,
        environment: &E,
        bytes: &[u8],
    ) -> HarnessResult<E::Bound> {
        let runtime = environment
            .new_runtime()
            .map_err(|e| HarnessError::RuntimeCreation(e.message))?;
        let parsed = environment
            .parse(bytes)
            .map_err(|e| HarnessError::Parse(e.message))?;
        let module = environment
            .load(runtime, parsed)
            .map_err(|e| HarnessError::Load(e.message))?;
        info!(functions = module.functions().len(), "module loaded");
        Ok(module)
    }

    /// Benchmark every exported function of a loaded module
    pub fn benchmark_module<M: BoundModule>(&mut self, module: &mut M) -> HarnessResult<()> {
        let mut enumerator = ModuleFunctionEnumerator::new(self.ctx.config.start_policy);
        while let Some(mut target) = enumerator.next_target(&mut *module, &mut self.ctx.reporter)? {
            self.benchmark(&mut target)?;
        }
        Ok(())
    }

    /// Benchmark the native routine list
    pub fn run_native(&mut self) -> HarnessResult<()> {
        for (name, routine) in native::routines() {
            let mut target = NativeTarget::new(name, routine);
            self.benchmark(&mut target)?;
        }
        Ok(())
    }

    /// Benchmark a single target, reporting non-fatal failures
    pub fn benchmark(
        &mut self,
        target: &mut dyn InvocationTarget,
    ) -> HarnessResult<Option<Measurement>> {
        match measure::benchmark(&mut self.ctx, target) {
            Ok(measurement) => {
                self.summary
                    .results
                    .push((target.label().to_string(), measurement.result));
                Ok(Some(measurement))
            }
            Err(err) if !err.is_fatal() => {
                warn!(target_name = target.label(), phase = err.phase(), "target skipped");
                self.ctx.reporter.error(target.label(), &err)?;
                self.summary.skipped += 1;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn context(&self) -> &HarnessContext {
        &self.ctx
    }
}
