//! Fuzz target: `StepConfig::from_json`
//!
//! Feeds arbitrary bytes to the config parser and verifies:
//! - No panics under any input
//! - Every accepted config also passes `validate()` and builds a step
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use brewsteps::{ProcessStep, StepConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = StepConfig::from_json(text) {
        assert!(config.validate().is_ok(), "parsed config must be valid");
        assert!(ProcessStep::new(config).is_ok());
    }
});
