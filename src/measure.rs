//! Calibration and dual measurement
//!
//! The clock only resolves milliseconds and nothing is known about a target's
//! cost up front. Calibration doubles the iteration count until one
//! invocation takes at least the calibration floor. Each sample then times the
//! target at `n` and `2n` iterations and keeps the difference: any fixed
//! per-call overhead (dispatch, call setup, clock reads) appears in both
//! readings and cancels, leaving the marginal cost of `n` iterations.

use tracing::{debug, trace};

use crate::error::{HarnessError, HarnessResult};
use crate::harness::HarnessContext;
use crate::stats::{BenchmarkResult, SampleSet, SAMPLE_COUNT};
use crate::target::InvocationTarget;

/// Outcome of calibrating one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// Smallest power of two whose invocation reached the floor
    pub loop_count: u64,
    /// Elapsed time of the invocation that reached the floor (ms)
    pub elapsed_ms: u64,
    /// Elapsed time at `loop_count / 2`, if calibration doubled at least once
    pub previous_elapsed_ms: Option<u64>,
}

/// Everything measured for one target
#[derive(Debug, Clone)]
pub struct Measurement {
    pub calibration: Calibration,
    pub samples: SampleSet,
    pub result: BenchmarkResult,
}

/// Invoke once and feed the result to the sponge
///
/// A non-fatal invocation failure is reported and counted as zero.
fn invoke(
    ctx: &mut HarnessContext,
    target: &mut dyn InvocationTarget,
    iterations: u64,
) -> HarnessResult<()> {
    let value = match target.invoke(iterations) {
        Ok(value) => value,
        Err(err) if !err.is_fatal() => {
            ctx.reporter.error(target.label(), &err)?;
            0.0
        }
        Err(err) => return Err(err),
    };
    ctx.sponge.absorb(value);
    Ok(())
}

fn timed_invoke(
    ctx: &mut HarnessContext,
    target: &mut dyn InvocationTarget,
    iterations: u64,
) -> HarnessResult<u64> {
    let begin = ctx.clock.now_ms();
    invoke(ctx, target, iterations)?;
    let end = ctx.clock.now_ms();
    Ok(end.saturating_sub(begin))
}

/// Find the smallest `2^k` iteration count that takes at least the floor
///
/// Gives up with [`HarnessError::CalibrationExhausted`] after
/// `max_doublings` doublings instead of spinning forever on a target whose
/// cost is invisible to the clock.
pub fn calibrate(
    ctx: &mut HarnessContext,
    target: &mut dyn InvocationTarget,
) -> HarnessResult<Calibration> {
    let floor = ctx.config.calibration_floor_ms;
    let max_doublings = ctx.config.max_doublings;

    let mut loop_count: u64 = 1;
    let mut doublings = 0;
    let mut previous_elapsed_ms = None;

    loop {
        let elapsed_ms = timed_invoke(ctx, target, loop_count)?;
        trace!(target_name = target.label(), loop_count, elapsed_ms, "calibration probe");

        if elapsed_ms >= floor {
            debug!(
                target_name = target.label(),
                loop_count, elapsed_ms, "calibrated"
            );
            return Ok(Calibration {
                loop_count,
                elapsed_ms,
                previous_elapsed_ms,
            });
        }

        if doublings >= max_doublings {
            return Err(HarnessError::CalibrationExhausted {
                target: target.label().to_string(),
                loop_count,
                elapsed_ms,
            });
        }

        previous_elapsed_ms = Some(elapsed_ms);
        loop_count *= 2;
        doublings += 1;
    }
}

/// Per-iteration cost estimate (ms) from one `n` / `2n` pair
pub fn dual_measure(
    ctx: &mut HarnessContext,
    target: &mut dyn InvocationTarget,
    loop_count: u64,
) -> HarnessResult<f64> {
    let begin = ctx.clock.now_ms();
    invoke(ctx, target, loop_count)?;
    let lap = ctx.clock.now_ms();
    invoke(ctx, target, loop_count * 2)?;
    let end = ctx.clock.now_ms();

    let single = lap.saturating_sub(begin);
    let double = end.saturating_sub(lap);
    // Quantization can make the 2n run read no longer than the n run.
    let elapsed = double.saturating_sub(single);

    trace!(
        target_name = target.label(),
        single,
        double,
        elapsed,
        "dual measurement"
    );

    Ok(elapsed as f64 / loop_count as f64)
}

/// Calibrate, take [`SAMPLE_COUNT`] samples and aggregate them
///
/// Samples are reported live as they are taken.
pub fn benchmark(
    ctx: &mut HarnessContext,
    target: &mut dyn InvocationTarget,
) -> HarnessResult<Measurement> {
    ctx.reporter.begin_target(target.label())?;

    let calibration = calibrate(ctx, target)?;

    let mut samples = [0.0; SAMPLE_COUNT];
    for sample in samples.iter_mut() {
        *sample = dual_measure(ctx, target, calibration.loop_count)?;
        ctx.reporter.sample(*sample)?;
    }

    let samples = SampleSet::new(samples);
    let result = samples.aggregate();
    ctx.reporter
        .finish_target(target.label(), calibration.loop_count, &samples, &result)?;

    Ok(Measurement {
        calibration,
        samples,
        result,
    })
}
