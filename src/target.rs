//! Invocation targets
//!
//! The measurement engine is written once against [`InvocationTarget`]. A
//! target runs its inner loop `iterations` times and hands back the value the
//! loop accumulated, which the engine feeds into the sponge.

use crate::error::{HarnessError, HarnessResult};
use crate::runtime::BoundModule;

/// Something the harness can time
pub trait InvocationTarget {
    /// Label used in report lines
    fn label(&self) -> &str;

    /// Run the target's inner loop `iterations` times
    ///
    /// A failed call is not fatal: the engine reports it and counts the
    /// invocation as a zero contribution.
    fn invoke(&mut self, iterations: u64) -> HarnessResult<f64>;
}

/// Native closure over a fixed inner loop
pub struct NativeTarget<F> {
    label: String,
    routine: F,
}

impl<F> NativeTarget<F>
where
    F: FnMut(u64) -> f64,
{
    pub fn new(name: &str, routine: F) -> Self {
        Self {
            label: format!("Native {}", name),
            routine,
        }
    }
}

impl<F> InvocationTarget for NativeTarget<F>
where
    F: FnMut(u64) -> f64,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(&mut self, iterations: u64) -> HarnessResult<f64> {
        Ok((self.routine)(iterations))
    }
}

/// Compiled module export, called with the iteration count as its argument
///
/// Borrows the module for as long as the target is being benchmarked; the
/// driver owns the module for the whole run.
pub struct ExportTarget<'m> {
    module: &'m mut dyn BoundModule,
    function: usize,
    name: String,
    label: String,
}

impl<'m> ExportTarget<'m> {
    pub(crate) fn new(module: &'m mut dyn BoundModule, function: usize, name: &str) -> Self {
        Self {
            module,
            function,
            name: name.to_string(),
            label: format!("Wasm {}", name),
        }
    }

    /// Export name as declared by the module
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function_index(&self) -> usize {
        self.function
    }
}

impl InvocationTarget for ExportTarget<'_> {
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(&mut self, iterations: u64) -> HarnessResult<f64> {
        self.module
            .call(self.function, iterations)
            .map_err(|e| HarnessError::Call {
                function: self.name.clone(),
                message: e.message,
            })?;
        Ok(self.module.result(self.function))
    }
}
