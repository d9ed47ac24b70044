//! Native math routines benchmarked alongside module exports
//!
//! Each routine sums a libm function over `i` in `[0, n)` and returns the sum
//! so the result can be absorbed by the sponge.

/// Signature shared by all native routines
pub type NativeRoutine = fn(u64) -> f64;

pub fn sin_f64(iterations: u64) -> f64 {
    let mut sum = 0.0f64;
    for i in 0..iterations {
        sum += (i as f64).sin();
    }
    sum
}

pub fn sin_f32(iterations: u64) -> f64 {
    let mut sum = 0.0f32;
    for i in 0..iterations {
        sum += (i as f32).sin();
    }
    sum as f64
}

pub fn sqrt_f64(iterations: u64) -> f64 {
    let mut sum = 0.0f64;
    for i in 0..iterations {
        sum += (i as f64).sqrt();
    }
    sum
}

// f32 square roots accumulated in f64
pub fn sqrt_f32(iterations: u64) -> f64 {
    let mut sum = 0.0f64;
    for i in 0..iterations {
        sum += (i as f32).sqrt() as f64;
    }
    sum
}

/// Routines in benchmark order, with their report names
pub fn routines() -> [(&'static str, NativeRoutine); 4] {
    [
        ("sin(f64)", sin_f64),
        ("sin(f32)", sin_f32),
        ("sqrt(f64)", sqrt_f64),
        ("sqrt(f32)", sqrt_f32),
    ]
}
