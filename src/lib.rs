//! wasmbench - millisecond-clock benchmark harness for module exports and
//! native math routines
//!
//! Every target is calibrated to a measurable loop count, then sampled with a
//! dual (`n` / `2n`) measurement that cancels fixed call overhead. Results
//! are fed to an anti-optimization sponge so no work can be elided.

pub mod cli;
pub mod clock;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod format;
pub mod harness;
pub mod measure;
pub mod native;
pub mod report;
pub mod runtime;
pub mod sponge;
pub mod stats;
pub mod target;
