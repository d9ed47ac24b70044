// Shared integration test utilities
//
// A virtual clock that only moves when a fake target or module says so, an
// in-memory module driven through the execution environment traits, and a
// capturing output sink.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;

use wasmbench::clock::Clock;
use wasmbench::config::HarnessConfig;
use wasmbench::harness::Harness;
use wasmbench::report::{OutputFormat, Reporter};
use wasmbench::runtime::{BoundModule, ExecutionEnvironment, FunctionInfo, RuntimeError};

/// Millisecond clock advanced explicitly
#[derive(Clone, Default)]
pub struct VirtualClock(Rc<Cell<u64>>);

impl VirtualClock {
    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Clock that replays a fixed sequence of readings
pub struct ScriptedClock {
    readings: RefCell<Vec<u64>>,
}

impl ScriptedClock {
    pub fn new(readings: &[u64]) -> Self {
        let mut readings = readings.to_vec();
        readings.reverse();
        Self {
            readings: RefCell::new(readings),
        }
    }
}

impl Clock for ScriptedClock {
    fn now_ms(&self) -> u64 {
        self.readings.borrow_mut().pop().unwrap_or(u64::MAX)
    }
}

/// Output sink whose contents can be read back after the reporter is dropped
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Behavior of one fake function
#[derive(Clone, Debug)]
pub struct FakeFunction {
    pub names: Vec<String>,
    pub imported: bool,
    pub overhead_ms: u64,
    pub per_iteration_ms: f64,
    pub compile_fails: bool,
    pub traps: bool,
}

impl FakeFunction {
    pub fn export(name: &str, per_iteration_ms: f64) -> Self {
        Self {
            names: vec![name.to_string()],
            imported: false,
            overhead_ms: 0,
            per_iteration_ms,
            compile_fails: false,
            traps: false,
        }
    }

    pub fn import(name: &str) -> Self {
        Self {
            imported: true,
            ..Self::export(name, 0.0)
        }
    }
}

/// In-memory execution environment over a list of fake functions
pub struct FakeEnvironment {
    pub clock: VirtualClock,
    pub functions: Vec<FakeFunction>,
    pub has_start: bool,
    pub start_fails: bool,
}

impl FakeEnvironment {
    pub fn new(clock: &VirtualClock, functions: Vec<FakeFunction>) -> Self {
        Self {
            clock: clock.clone(),
            functions,
            has_start: false,
            start_fails: false,
        }
    }
}

impl ExecutionEnvironment for FakeEnvironment {
    type Parsed = Vec<FakeFunction>;
    type Runtime = ();
    type Bound = FakeModule;

    fn new_runtime(&self) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<FakeFunction>, RuntimeError> {
        if bytes.starts_with(b"fake") {
            Ok(self.functions.clone())
        } else {
            Err(RuntimeError::new("magic header not detected"))
        }
    }

    fn load(&self, _runtime: (), parsed: Vec<FakeFunction>) -> Result<FakeModule, RuntimeError> {
        Ok(FakeModule {
            clock: self.clock.clone(),
            info: parsed
                .iter()
                .map(|f| FunctionInfo {
                    names: f.names.clone(),
                    imported: f.imported,
                    compiled: false,
                })
                .collect(),
            specs: parsed,
            has_start: self.has_start,
            start_fails: self.start_fails,
            start_runs: 0,
            last_result: 0.0,
        })
    }
}

pub struct FakeModule {
    clock: VirtualClock,
    info: Vec<FunctionInfo>,
    specs: Vec<FakeFunction>,
    has_start: bool,
    start_fails: bool,
    pub start_runs: usize,
    last_result: f64,
}

impl BoundModule for FakeModule {
    fn functions(&self) -> &[FunctionInfo] {
        &self.info
    }

    fn compile(&mut self, function: usize) -> Result<(), RuntimeError> {
        if self.specs[function].compile_fails {
            return Err(RuntimeError::new("invalid function body"));
        }
        self.info[function].compiled = true;
        Ok(())
    }

    fn declares_start(&self) -> bool {
        self.has_start
    }

    fn run_start(&mut self) -> Result<(), RuntimeError> {
        self.start_runs += 1;
        if self.start_fails {
            return Err(RuntimeError::new("start trapped"));
        }
        Ok(())
    }

    fn call(&mut self, function: usize, iterations: u64) -> Result<(), RuntimeError> {
        let spec = &self.specs[function];
        if spec.traps {
            return Err(RuntimeError::new("wasm trap: unreachable"));
        }
        let cost = spec.overhead_ms + (spec.per_iteration_ms * iterations as f64) as u64;
        self.clock.advance(cost);
        self.last_result = iterations as f64;
        Ok(())
    }

    fn result(&self, _function: usize) -> f64 {
        self.last_result
    }
}

/// Harness over a virtual clock writing to a capture buffer
pub fn harness(
    clock: &VirtualClock,
    config: HarnessConfig,
    format: OutputFormat,
) -> (Harness, Capture) {
    let capture = Capture::default();
    let reporter = Reporter::new(
        Box::new(capture.clone()),
        format,
        config.calibration_floor_ms,
    );
    (
        Harness::new(config, Box::new(clock.clone()), reporter),
        capture,
    )
}
