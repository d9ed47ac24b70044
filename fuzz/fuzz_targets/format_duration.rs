#![no_main]

use libfuzzer_sys::fuzz_target;
use wasmbench::format::format_duration;

fuzz_target!(|data: [u8; 8]| {
    // Any bit pattern, including NaN, infinities and negatives, must format
    let ms = f64::from_bits(u64::from_le_bytes(data));
    let formatted = format_duration(ms);
    assert!(!formatted.is_empty());
});
