//! Execution environment boundary
//!
//! The harness never parses or executes bytecode itself. It talks to an
//! execution environment through the traits below: parse and load a module,
//! walk its function table, request compilation and start semantics, and call
//! exports with an iteration count.

pub mod wasmtime_backend;

pub use wasmtime_backend::{EngineOptions, WasmtimeEnvironment, WasmtimeModule};

/// Error reported by the execution environment for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// One entry of a bound module's function table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    /// Every name the function is exported (or imported) under
    pub names: Vec<String>,
    /// Supplied by the host rather than defined by the module
    pub imported: bool,
    /// Ready to call without further preparation
    pub compiled: bool,
}

/// Creates runtimes and bound modules from raw bytes
pub trait ExecutionEnvironment {
    type Parsed;
    type Runtime;
    type Bound: BoundModule;

    fn new_runtime(&self) -> Result<Self::Runtime, RuntimeError>;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Parsed, RuntimeError>;

    /// Bind a parsed module into a runtime; the module takes the runtime over
    fn load(&self, runtime: Self::Runtime, parsed: Self::Parsed)
        -> Result<Self::Bound, RuntimeError>;
}

/// A module loaded into a runtime
///
/// Functions are addressed by their index in [`BoundModule::functions`].
pub trait BoundModule {
    /// Function table in declaration order
    fn functions(&self) -> &[FunctionInfo];

    fn compile(&mut self, function: usize) -> Result<(), RuntimeError>;

    /// Whether a start function still has to run before exports are callable
    fn declares_start(&self) -> bool;

    fn run_start(&mut self) -> Result<(), RuntimeError>;

    /// Call `function` with the iteration count as its only argument
    fn call(&mut self, function: usize, iterations: u64) -> Result<(), RuntimeError>;

    /// Numeric result of the most recent successful call to `function`
    fn result(&self, function: usize) -> f64;
}
