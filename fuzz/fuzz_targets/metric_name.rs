#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((head, rest)) = data.split_first() else {
        return;
    };
    if let Ok(input) = std::str::from_utf8(rest) {
        let (normalized, _, _) = stac_perf::fuzzing::normalize_metric_input(input, f64::from(*head));
        assert!(!normalized.contains(' '));
    }
});
