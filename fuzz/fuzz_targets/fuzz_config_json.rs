//! Fuzz target: `ComponentConfig::from_json`
//!
//! Arbitrary bytes must never panic the config loader, and anything it
//! accepts must pass validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use mathcomp::config::ComponentConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ComponentConfig::from_json(text) {
        assert!(config.validate().is_ok());
        assert!(config.factor_updated_throttle > 0);
    }
});
