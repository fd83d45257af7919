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

//! Extract translatable strings from source code.
//!
//! This works like `xgettext --language Python`, but only for the
//! simple case: a `_()` call around a single string literal.

use crate::table::TranslationTable;
use crate::{add_message, new_metadata, read_catalog, translation, LocaleDir};
use anyhow::Context;
use polib::catalog::Catalog;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// File extensions scanned when none are given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "kv"];

/// Extract the translatable strings from `content`.
///
/// The strings are labeled with the line number where the `_()`
/// call starts. Empty strings are skipped.
///
/// # Examples
///
/// ```
/// use po_csv_helpers::extract::extract_messages;
///
/// assert_eq!(
///     extract_messages("label = _('Send')\nprint(_(\"Receive\"))\n"),
///     vec![(1, String::from("Send")), (2, String::from("Receive"))]
/// );
/// ```
pub fn extract_messages(content: &str) -> Vec<(usize, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        let pattern = r#"(?x)
              \b_\(\s*                            # the gettext call
              (?:
                  "(?<double>(?:[^"\\\n]|\\.)*)"  # a double-quoted literal
                | '(?<single>(?:[^'\\\n]|\\.)*)'  # or a single-quoted literal
              )
              \s*\)                               # closing the call
        "#;
        Regex::new(pattern).expect("well-formed regex")
    });

    // Offsets of each newline in the input, used to calculate line
    // numbers from byte offsets.
    let offsets = content
        .match_indices('\n')
        .map(|(offset, _)| offset)
        .collect::<Vec<_>>();

    re.captures_iter(content)
        .filter_map(|captures| {
            let start = captures.get(0)?.start();
            let literal = captures
                .name("double")
                .or_else(|| captures.name("single"))?;
            let msgid = unescape(literal.as_str());
            if msgid.is_empty() {
                return None;
            }
            let lineno = offsets.partition_point(|&o| o < start) + 1;
            Some((lineno, msgid))
        })
        .collect()
}

/// Decode the escape sequences of a string literal.
///
/// Unknown escapes are kept as written.
fn unescape(literal: &str) -> String {
    let mut result = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            Some('u') => {
                let hex = chars.clone().take(4).collect::<String>();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        result.push(decoded);
                        chars.nth(3);
                    }
                    _ => result.push_str("\\u"),
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Find the files under `root` with one of the given extensions.
///
/// The files are returned in a stable order: directories are walked
/// depth-first and entries are sorted by file name.
pub fn find_source_files(root: &Path, extensions: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Could not walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext));
        if matches {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Build a template catalog with the strings found under `root`.
///
/// Messages are kept in discovery order. A string found several
/// times is added once, with all its sources.
pub fn create_template(root: &Path, extensions: &[String]) -> anyhow::Result<Catalog> {
    if !root.is_dir() {
        anyhow::bail!("Source directory {} does not exist", root.display());
    }
    let files = find_source_files(root, extensions)?;
    tracing::info!("Found {} files to translate", files.len());

    let mut catalog = Catalog::new(new_metadata(""));
    for path in &files {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let relative = path.strip_prefix(root).unwrap_or(path);
        for (lineno, msgid) in extract_messages(&content) {
            let source = format!("{}:{}", relative.display(), lineno);
            add_message(&mut catalog, &msgid, &source);
        }
    }
    tracing::debug!("Extracted {} messages", catalog.messages().count());
    Ok(catalog)
}

/// Build a CSV table with one row per message of `template` and
/// blank cells for each of `locales`.
pub fn create_table<S: AsRef<str>>(template: &Catalog, locales: &[S]) -> TranslationTable {
    let mut table = TranslationTable::new(locales.iter().map(|locale| locale.as_ref()));
    for message in template.messages() {
        table.row_mut(message.msgid()).source = String::from(message.source());
    }
    table
}

/// Fill the cells of `table` with the translations already present
/// in the catalogs of `locale_dir`.
///
/// Locales without a catalog are left blank.
pub fn prefill(table: &mut TranslationTable, locale_dir: &LocaleDir) -> anyhow::Result<()> {
    let msgids = table
        .rows()
        .iter()
        .map(|row| row.msgid.clone())
        .collect::<Vec<_>>();
    for locale in table.locales().to_vec() {
        let path = locale_dir.po_path(&locale);
        if !path.exists() {
            tracing::debug!("No catalog for {locale} at {}", path.display());
            continue;
        }
        let catalog = read_catalog(&path)?;
        for msgid in &msgids {
            if let Some(msgstr) = catalog
                .find_message(None, msgid, None)
                .and_then(|msg| translation(msg))
            {
                table.set(msgid, &locale, msgstr);
            }
        }
    }
    Ok(())
}
