#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // The parser is total: one node per line, no panics.
        let doc = rewtrace::parse(s);
        assert_eq!(doc.nodes.len(), s.split('\n').count());
    }
});
