//! Module export enumeration
//!
//! Walks a bound module's function table in declaration order and yields one
//! [`ExportTarget`] per exported name. Imported functions are skipped. A
//! function that fails to compile, or whose module start function fails, is
//! reported and skipped without stopping the walk.

use tracing::debug;

use crate::config::StartPolicy;
use crate::error::{HarnessError, HarnessResult};
use crate::report::Reporter;
use crate::runtime::BoundModule;
use crate::target::ExportTarget;

pub struct ModuleFunctionEnumerator {
    policy: StartPolicy,
    function: usize,
    name: usize,
    started: bool,
}

impl ModuleFunctionEnumerator {
    pub fn new(policy: StartPolicy) -> Self {
        Self {
            policy,
            function: 0,
            name: 0,
            started: false,
        }
    }

    /// Prepare and return the next exported name, or `None` when done
    ///
    /// The returned target borrows the module until it is dropped, so targets
    /// are benchmarked one at a time in declaration order.
    pub fn next_target<'m>(
        &mut self,
        module: &'m mut dyn BoundModule,
        reporter: &mut Reporter,
    ) -> HarnessResult<Option<ExportTarget<'m>>> {
        loop {
            let (index, name, compiled) = match self.advance(module) {
                Some(next) => next,
                None => return Ok(None),
            };
            let label = format!("Wasm {}", name);

            if !compiled {
                debug!(function = %name, "compiling");
                if let Err(e) = module.compile(index) {
                    let err = HarnessError::Compile {
                        function: name,
                        message: e.message,
                    };
                    reporter.error(&label, &err)?;
                    continue;
                }
            }

            if self.start_required(module) {
                debug!(function = %name, "running start function");
                if let Err(e) = module.run_start() {
                    let err = HarnessError::Start {
                        function: name,
                        message: e.message,
                    };
                    reporter.error(&label, &err)?;
                    continue;
                }
                self.started = true;
            }

            return Ok(Some(ExportTarget::new(module, index, &name)));
        }
    }

    /// Move the cursor to the next exported name
    fn advance(&mut self, module: &dyn BoundModule) -> Option<(usize, String, bool)> {
        let functions = module.functions();
        loop {
            let info = functions.get(self.function)?;
            if info.imported {
                self.function += 1;
                self.name = 0;
                continue;
            }
            match info.names.get(self.name) {
                Some(name) => {
                    self.name += 1;
                    return Some((self.function, name.clone(), info.compiled));
                }
                None => {
                    self.function += 1;
                    self.name = 0;
                }
            }
        }
    }

    fn start_required(&self, module: &dyn BoundModule) -> bool {
        match self.policy {
            StartPolicy::PerExport => module.declares_start(),
            StartPolicy::OncePerModule => !self.started && module.declares_start(),
        }
    }
}
