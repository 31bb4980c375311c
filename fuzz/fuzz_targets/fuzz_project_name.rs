#![no_main]

use hoist::domain::value_objects::ProjectName;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(url) = std::str::from_utf8(data) {
        if let Some(name) = ProjectName::from_repository(url) {
            // Every derived name is spliced into remote shell commands
            // and used as a compose project and image name
            let s = name.as_str();
            assert!(s
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_-".contains(c)));
            assert!(!s.contains("--") && !s.contains("__") && !s.contains("-_") && !s.contains("_-"));
        }
    }
});
