use arbitrary::Arbitrary;
use po_csv_helpers::table::TranslationTable;

/// Wrapper for generating an arbitrary CSV row.
#[derive(Arbitrary, Debug)]
pub struct Row {
    pub msgid: String,
    pub source: String,
    pub translations: Vec<(String, String)>,
}

/// Generate a table from random rows for fuzzing.
pub fn create_table(rows: Vec<Row>) -> TranslationTable {
    let mut table = TranslationTable::new(Vec::<String>::new());
    for row in rows {
        if row.msgid.is_empty() {
            continue;
        }
        table.row_mut(&row.msgid).source = row.source;
        for (locale, msgstr) in row.translations {
            table.set(&row.msgid, &locale, &msgstr);
        }
    }
    table
}
