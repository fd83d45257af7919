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

//! Collect the PO files of a locale tree into a single table.

use crate::table::TranslationTable;
use crate::{read_catalog, translation};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find all `<domain>.po` files under `root`, sorted by path.
pub fn find_po_files(root: &Path, domain: &str) -> anyhow::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Locale directory {} does not exist", root.display());
    }
    let file_name = format!("{domain}.po");
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Could not walk {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// The locale of a catalog is the name of its directory.
pub fn locale_of(path: &Path) -> Option<&str> {
    path.parent()?.file_name()?.to_str()
}

/// Merge the given PO files into one table with a column per
/// locale.
///
/// Rows are keyed by `msgid` and appear in the order they are first
/// seen. Untranslated and fuzzy messages give empty cells.
pub fn harvest(files: &[PathBuf]) -> anyhow::Result<TranslationTable> {
    let mut table = TranslationTable::new(Vec::<String>::new());
    let mut reference_msgids: Option<Vec<String>> = None;

    for path in files {
        let locale = locale_of(path)
            .with_context(|| format!("Could not find the locale of {}", path.display()))?;
        let catalog = read_catalog(path)?;
        table.add_locale(locale);

        let msgids = catalog
            .messages()
            .map(|msg| String::from(msg.msgid()))
            .collect::<Vec<_>>();
        let reference = reference_msgids.get_or_insert_with(|| msgids.clone());
        if *reference != msgids {
            tracing::warn!("Different keys or order in {}", path.display());
        }

        let mut translated = 0;
        for message in catalog.messages() {
            let row = table.row_mut(message.msgid());
            if row.source.is_empty() {
                row.source = String::from(message.source());
            }
            if let Some(msgstr) = translation(message) {
                table.set(message.msgid(), locale, msgstr);
                translated += 1;
            }
        }
        tracing::info!("Read {translated} translations for {locale} from {}", path.display());
    }

    Ok(table)
}
