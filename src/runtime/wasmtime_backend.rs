//! Wasmtime-backed execution environment
//!
//! Wasmtime compiles a whole module up front and runs the start function as
//! part of instantiation, so the per-function compile step here is a signature
//! check and "start" means "instantiate". Wasmtime does not say whether a
//! module declares a start function, so every start request is honored with a
//! fresh instance: globals and memory are reset and any start function runs
//! again. Imports are linked as traps: they are never benchmarked, but the
//! module must still instantiate.

use wasmtime::{
    Config, Engine, ExternType, Func, FuncType, Instance, InstancePre, Linker, Module, Store,
    StoreLimits, StoreLimitsBuilder, Val, ValType,
};

use super::{BoundModule, ExecutionEnvironment, FunctionInfo, RuntimeError};

/// Tunables applied when the engine and store are created
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub max_wasm_stack: Option<usize>,
    pub memory_limit: Option<usize>,
}

pub struct WasmtimeEnvironment {
    engine: Engine,
    options: EngineOptions,
}

/// Per-store host state
pub struct HostState {
    limits: StoreLimits,
}

impl WasmtimeEnvironment {
    pub fn new(options: EngineOptions) -> Result<Self, RuntimeError> {
        let mut config = Config::new();
        if let Some(bytes) = options.max_wasm_stack {
            config.max_wasm_stack(bytes);
        }
        let engine = Engine::new(&config).map_err(|e| describe(&e))?;
        Ok(Self { engine, options })
    }
}

impl ExecutionEnvironment for WasmtimeEnvironment {
    type Parsed = Module;
    type Runtime = Store<HostState>;
    type Bound = WasmtimeModule;

    fn new_runtime(&self) -> Result<Self::Runtime, RuntimeError> {
        let mut limits = StoreLimitsBuilder::new();
        if let Some(bytes) = self.options.memory_limit {
            limits = limits.memory_size(bytes);
        }
        let mut store = Store::new(
            &self.engine,
            HostState {
                limits: limits.build(),
            },
        );
        store.limiter(|state| &mut state.limits);
        Ok(store)
    }

    fn parse(&self, bytes: &[u8]) -> Result<Module, RuntimeError> {
        Module::new(&self.engine, bytes).map_err(|e| describe(&e))
    }

    fn load(&self, runtime: Self::Runtime, module: Module) -> Result<WasmtimeModule, RuntimeError> {
        let mut linker: Linker<HostState> = Linker::new(&self.engine);
        linker
            .define_unknown_imports_as_traps(&module)
            .map_err(|e| describe(&e))?;
        let pre = linker.instantiate_pre(&module).map_err(|e| describe(&e))?;

        let mut functions = Vec::new();
        let mut slots = Vec::new();

        for import in module.imports() {
            if let ExternType::Func(_) = import.ty() {
                functions.push(FunctionInfo {
                    names: vec![format!("{}.{}", import.module(), import.name())],
                    imported: true,
                    compiled: false,
                });
                slots.push(Slot::Imported);
            }
        }

        for export in module.exports() {
            if let ExternType::Func(ty) = export.ty() {
                functions.push(FunctionInfo {
                    names: vec![export.name().to_string()],
                    imported: false,
                    compiled: false,
                });
                slots.push(Slot::Export(ExportSlot {
                    name: export.name().to_string(),
                    ty,
                    wide_argument: false,
                    handle: None,
                    last_result: 0.0,
                }));
            }
        }

        Ok(WasmtimeModule {
            store: runtime,
            pre,
            instance: None,
            functions,
            slots,
        })
    }
}

enum Slot {
    Imported,
    Export(ExportSlot),
}

struct ExportSlot {
    name: String,
    ty: FuncType,
    /// Iteration count is passed as i64 rather than i32
    wide_argument: bool,
    handle: Option<Func>,
    last_result: f64,
}

pub struct WasmtimeModule {
    store: Store<HostState>,
    pre: InstancePre<HostState>,
    instance: Option<Instance>,
    functions: Vec<FunctionInfo>,
    slots: Vec<Slot>,
}

impl WasmtimeModule {
    fn export_slot(&mut self, function: usize) -> Result<&mut ExportSlot, RuntimeError> {
        match self.slots.get_mut(function) {
            Some(Slot::Export(slot)) => Ok(slot),
            Some(Slot::Imported) => Err(RuntimeError::new("function is imported")),
            None => Err(RuntimeError::new(format!("no function at index {}", function))),
        }
    }
}

impl BoundModule for WasmtimeModule {
    fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    fn compile(&mut self, function: usize) -> Result<(), RuntimeError> {
        let slot = self.export_slot(function)?;

        let params: Vec<ValType> = slot.ty.params().collect();
        let results: Vec<ValType> = slot.ty.results().collect();

        let wide_argument = match params.as_slice() {
            [ValType::I32] => false,
            [ValType::I64] => true,
            _ => {
                return Err(RuntimeError::new(format!(
                    "{}: expected a single i32 or i64 parameter",
                    slot.name
                )))
            }
        };
        if !matches!(
            results.as_slice(),
            [ValType::I32 | ValType::I64 | ValType::F32 | ValType::F64]
        ) {
            return Err(RuntimeError::new(format!(
                "{}: expected a single numeric result",
                slot.name
            )));
        }

        slot.wide_argument = wide_argument;
        self.functions[function].compiled = true;
        Ok(())
    }

    // Instantiation is the start step, with or without a start section
    fn declares_start(&self) -> bool {
        true
    }

    fn run_start(&mut self) -> Result<(), RuntimeError> {
        let instance = self
            .pre
            .instantiate(&mut self.store)
            .map_err(|e| describe(&e))?;
        // Cached handles belong to the previous instance
        for slot in &mut self.slots {
            if let Slot::Export(slot) = slot {
                slot.handle = None;
            }
        }
        self.instance = Some(instance);
        Ok(())
    }

    fn call(&mut self, function: usize, iterations: u64) -> Result<(), RuntimeError> {
        let instance = self
            .instance
            .ok_or_else(|| RuntimeError::new("module is not instantiated"))?;

        let slot = match self.slots.get_mut(function) {
            Some(Slot::Export(slot)) => slot,
            _ => return Err(RuntimeError::new("not an exported function")),
        };

        let func = match slot.handle {
            Some(func) => func,
            None => {
                let func = instance
                    .get_func(&mut self.store, &slot.name)
                    .ok_or_else(|| RuntimeError::new(format!("export {} not found", slot.name)))?;
                slot.handle = Some(func);
                func
            }
        };

        let argument = if slot.wide_argument {
            Val::I64(iterations as i64)
        } else {
            let narrow = i32::try_from(iterations).map_err(|_| {
                RuntimeError::new(format!("iteration count {} does not fit in i32", iterations))
            })?;
            Val::I32(narrow)
        };

        let mut results = [Val::I32(0)];
        func.call(&mut self.store, &[argument], &mut results)
            .map_err(|e| describe(&e))?;
        slot.last_result = numeric(&results[0]);
        Ok(())
    }

    fn result(&self, function: usize) -> f64 {
        match self.slots.get(function) {
            Some(Slot::Export(slot)) => slot.last_result,
            _ => 0.0,
        }
    }
}

fn numeric(value: &Val) -> f64 {
    match value {
        Val::I32(v) => *v as f64,
        Val::I64(v) => *v as f64,
        Val::F32(bits) => f32::from_bits(*bits) as f64,
        Val::F64(bits) => f64::from_bits(*bits),
        _ => 0.0,
    }
}

// Keep report lines single-line: wasmtime errors carry multi-line context.
fn describe(err: &wasmtime::Error) -> RuntimeError {
    let root = err.root_cause().to_string();
    let line = root.lines().next().unwrap_or("unknown error").trim();
    RuntimeError::new(line)
}
