// Duration formatter: unit thresholds and truncation

use proptest::prelude::*;
use wasmbench::format::format_duration;

#[test]
fn test_reference_values() {
    assert_eq!(format_duration(15000.0), "15s");
    assert_eq!(format_duration(50.0), "50ms");
    assert_eq!(format_duration(0.05), "50µs");
    assert_eq!(format_duration(0.00005), "50ns");
    assert_eq!(format_duration(0.0000004), "0");
    assert_eq!(format_duration(0.000001), "1ns");
    assert_eq!(format_duration(0.0), "0");
}

#[test]
fn test_threshold_boundaries() {
    assert_eq!(format_duration(9.9995), "9999µs");
    assert_eq!(format_duration(10.0), "10ms");
    assert_eq!(format_duration(9999.99), "9999ms");
    assert_eq!(format_duration(10000.0), "10s");
    assert_eq!(format_duration(0.005), "5000ns");
}

fn unit(formatted: &str) -> &str {
    formatted.trim_start_matches(|c: char| c.is_ascii_digit())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_unit_follows_thresholds(ms in 0.0f64..100_000.0) {
        let formatted = format_duration(ms);
        let expected = if ms >= 10_000.0 {
            "s"
        } else if ms >= 10.0 {
            "ms"
        } else if ms >= 0.01 {
            "µs"
        } else if formatted == "0" {
            ""
        } else {
            "ns"
        };
        prop_assert_eq!(unit(&formatted), expected);
    }

    /// Truncation: the printed value never exceeds the input in its unit
    #[test]
    fn prop_truncates_milliseconds(ms in 10.0f64..10_000.0) {
        let formatted = format_duration(ms);
        let value: f64 = formatted.trim_end_matches("ms").parse().unwrap();
        prop_assert!(value <= ms);
        prop_assert!(ms - value < 1.0);
    }
}
