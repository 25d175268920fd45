#![no_main]

use libfuzzer_sys::fuzz_target;
use revivir::normalize;

fuzz_target!(|data: &[u8]| {
    // Trace logs are adversarially noisy; normalization must degrade to
    // sentinel values for any input rather than panic
    if let Ok(input) = std::str::from_utf8(data) {
        let events = normalize::parse_trace(input);
        let _ = revivir::stats::summarize(&events);
        let _ = revivir::lifetime::reconstruct(&events);
    }
});
