//! Fuzz target for settings.json parsing and validation.
//!
//! Arbitrary input must parse or fail cleanly, and anything that parses must
//! validate without panicking.

#![no_main]

use bd_config::{validate_settings, Settings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(settings) = serde_json::from_slice::<Settings>(data) {
        let _ = validate_settings(&settings);
    }
});
