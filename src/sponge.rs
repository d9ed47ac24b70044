//! Anti-optimization sponge
//!
//! Every invocation result is folded into one accumulator so the optimizer
//! can never prove a benchmarked call dead. Nothing in the harness makes a
//! decision based on the value.

use std::hint::black_box;

#[derive(Debug, Default)]
pub struct Sponge {
    total: f64,
}

impl Sponge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one invocation result into the accumulator
    pub fn absorb(&mut self, value: f64) {
        self.total = black_box(self.total + black_box(value));
    }

    /// Current accumulated value, only read for diagnostics
    pub fn value(&self) -> f64 {
        self.total
    }
}
