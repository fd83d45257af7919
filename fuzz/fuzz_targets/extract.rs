#![no_main]

use libfuzzer_sys::fuzz_target;
use po_csv_helpers::extract::extract_messages;

fuzz_target!(|content: &str| {
    for (lineno, msgid) in extract_messages(content) {
        assert!(lineno >= 1);
        assert!(!msgid.is_empty());
    }
});
