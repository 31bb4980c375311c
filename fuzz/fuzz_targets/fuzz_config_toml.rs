#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Parsing and validating a config file must never panic
        if let Ok(config) = toml::from_str::<hoist::Config>(content) {
            let _ = hoist::DeploymentConfig::from_input(config.to_input());
        }
    }
});
