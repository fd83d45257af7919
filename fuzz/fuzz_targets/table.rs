#![no_main]

use libfuzzer_sys::fuzz_target;
use po_csv_helpers::table::TranslationTable;

fuzz_target!(|data: &[u8]| {
    // Err(_) is fine, but a parsed table must survive a round-trip.
    if let Ok(table) = TranslationTable::from_reader(data) {
        let mut buffer = Vec::new();
        table.to_writer(&mut buffer).unwrap();
        let reparsed = TranslationTable::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(reparsed.rows().len(), table.rows().len());
    }
});
