// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The CSV file shared by all commands.
//!
//! The first row is a header. The first column holds the `msgid`,
//! an optional column titled `source` holds `path:line` references,
//! and every other column holds the translations for the locale
//! named in its header:
//!
//! ```text
//! msgid,source,en_UK,ko_KR
//! Send,gui/qt/main_window.py:120,Send,보내기
//! ```

use anyhow::{bail, Context};
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Conventional title of the first column.
pub const MSGID_COLUMN: &str = "msgid";

/// Title of the column with source references.
pub const SOURCE_COLUMN: &str = "source";

/// One row of a [`TranslationTable`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRow {
    pub msgid: String,
    pub source: String,
    /// One cell per locale column, empty if untranslated.
    pub translations: Vec<String>,
}

/// In-memory form of the CSV file.
///
/// Rows are unique by `msgid` and kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationTable {
    locales: Vec<String>,
    rows: Vec<TableRow>,
    index: HashMap<String, usize>,
}

impl TranslationTable {
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Locale column headers, in column order.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn locale_index(&self, locale: &str) -> Option<usize> {
        self.locales.iter().position(|known| known == locale)
    }

    /// Add a locale column, returning its index. Existing rows get an
    /// empty cell.
    pub fn add_locale(&mut self, locale: &str) -> usize {
        if let Some(idx) = self.locale_index(locale) {
            return idx;
        }
        self.locales.push(String::from(locale));
        for row in &mut self.rows {
            row.translations.push(String::new());
        }
        self.locales.len() - 1
    }

    pub fn row(&self, msgid: &str) -> Option<&TableRow> {
        self.index.get(msgid).map(|&idx| &self.rows[idx])
    }

    /// Returns the row for `msgid`, appending an empty row if needed.
    pub fn row_mut(&mut self, msgid: &str) -> &mut TableRow {
        let idx = match self.index.get(msgid) {
            Some(&idx) => idx,
            None => {
                self.rows.push(TableRow {
                    msgid: String::from(msgid),
                    source: String::new(),
                    translations: vec![String::new(); self.locales.len()],
                });
                self.index.insert(String::from(msgid), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }

    /// Returns the translation of `msgid` into `locale`, if non-empty.
    pub fn get(&self, msgid: &str, locale: &str) -> Option<&str> {
        let row = self.row(msgid)?;
        let idx = self.locale_index(locale)?;
        Some(row.translations[idx].as_str()).filter(|cell| !cell.is_empty())
    }

    /// Set the cell of `msgid` in `locale`, adding the row and column
    /// as needed.
    pub fn set(&mut self, msgid: &str, locale: &str, msgstr: &str) {
        let idx = self.add_locale(locale);
        self.row_mut(msgid).translations[idx] = String::from(msgstr);
    }

    /// Parse a table from CSV.
    ///
    /// Rows with the wrong number of fields or without a `msgid` are
    /// skipped with a warning. A later row for the same `msgid`
    /// overrides the non-empty cells of an earlier one.
    pub fn from_reader<R: io::Read>(reader: R) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = reader.records();

        let header = match records.next() {
            Some(header) => header.context("Could not read the header row")?,
            None => bail!("Missing header row"),
        };
        let mut source_column = None;
        let mut locale_columns = Vec::new();
        for (idx, title) in header.iter().enumerate().skip(1) {
            let title = title.trim();
            if title == SOURCE_COLUMN && source_column.is_none() {
                source_column = Some(idx);
            } else {
                locale_columns.push((idx, String::from(title)));
            }
        }

        let mut table = Self::new(locale_columns.iter().map(|(_, title)| title.clone()));
        for record in records {
            let record = record.context("Could not read CSV row")?;
            let line = record.position().map_or(0, |pos| pos.line());
            if record.len() != header.len() {
                tracing::warn!(
                    "Skipping line {line}: expected {} fields, found {}",
                    header.len(),
                    record.len()
                );
                continue;
            }
            let msgid = &record[0];
            if msgid.is_empty() {
                tracing::warn!("Skipping line {line}: empty msgid");
                continue;
            }

            let row = table.row_mut(msgid);
            if let Some(idx) = source_column {
                if !record[idx].is_empty() {
                    row.source = String::from(&record[idx]);
                }
            }
            for (cell_idx, (idx, _)) in locale_columns.iter().enumerate() {
                if !record[*idx].is_empty() {
                    row.translations[cell_idx] = String::from(&record[*idx]);
                }
            }
        }

        Ok(table)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        Self::from_reader(io::BufReader::new(file))
            .with_context(|| format!("Could not parse {} as CSV", path.display()))
    }

    /// Write the table as CSV, header first.
    pub fn to_writer<W: io::Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        let mut header = vec![MSGID_COLUMN, SOURCE_COLUMN];
        header.extend(self.locales.iter().map(String::as_str));
        writer.write_record(&header)?;
        for row in &self.rows {
            let mut record = vec![row.msgid.as_str(), row.source.as_str()];
            record.extend(row.translations.iter().map(String::as_str));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        self.to_writer(io::BufWriter::new(file))
            .with_context(|| format!("Could not write {}", path.display()))
    }
}
