#![no_main]

use libfuzzer_sys::fuzz_target;
use po_csv_helpers::compile::create_catalog;
use po_csv_helpers_fuzz::{create_table, Row};

fuzz_target!(|rows: Vec<Row>| {
    let table = create_table(rows);
    for locale in table.locales() {
        let catalog = create_catalog(&table, locale, None);
        for message in catalog.messages() {
            assert!(message.is_translated());
        }
    }
});
