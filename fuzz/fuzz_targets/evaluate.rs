#![no_main]

use libfuzzer_sys::fuzz_target;
use rewtrace::{EvalInput, evaluate};

fuzz_target!(|data: &[u8]| {
    if let Ok(rules) = std::str::from_utf8(data) {
        let input = EvalInput {
            url: "http://example.com/fuzz/path?q=1".to_string(),
            rules: rules.to_string(),
            server_variables: Default::default(),
        };
        // Evaluation is total and every trace line upholds the
        // valid-implies-met contract.
        let result = evaluate(&input);
        for line in &result.trace {
            assert!(line.valid || !line.met);
        }
    }
});
