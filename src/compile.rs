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

//! Compile a completed CSV file into PO and MO files.
//!
//! Every column of the CSV file named after a supported locale turns
//! into one PO file and one MO file in the locale tree. The PO files
//! contain only translated messages, sorted by `msgid`, so compiling
//! the same CSV file twice gives the same output except for the
//! revision date.

use crate::locales::{self, UnknownLocalePolicy};
use crate::table::TranslationTable;
use crate::{new_metadata, now, read_catalog, translation, LocaleDir};
use anyhow::{bail, Context};
use polib::catalog::Catalog;
use polib::message::Message;
use polib::{mo_file, po_file};
use std::collections::BTreeMap;
use std::fs;

/// Settings for [`compile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub unknown_locales: UnknownLocalePolicy,
    /// Keep the translations already present in the PO files.
    pub merge: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            unknown_locales: UnknownLocalePolicy::default(),
            merge: true,
        }
    }
}

/// Returns the locale columns of `table` which should be compiled.
///
/// Fails if no column is left: there would be nothing to compile.
pub fn select_locales(
    table: &TranslationTable,
    policy: UnknownLocalePolicy,
) -> anyhow::Result<Vec<&str>> {
    let mut selected = Vec::new();
    for locale in table.locales() {
        if locales::is_supported(locale) {
            selected.push(locale.as_str());
            continue;
        }
        match policy {
            UnknownLocalePolicy::Ignore => {
                tracing::debug!("Ignoring column {locale:?}: not a supported locale")
            }
            UnknownLocalePolicy::Warn => {
                tracing::warn!("Ignoring column {locale:?}: not a supported locale")
            }
            UnknownLocalePolicy::Error => bail!(
                "Column {locale:?} is not a supported locale, expected one of {}",
                locales::supported_codes().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    if selected.is_empty() {
        bail!(
            "Nothing to compile: no column is named after a supported locale ({})",
            locales::supported_codes().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(selected)
}

/// Build the catalog for `locale` from the non-empty cells of its
/// column.
///
/// Translated messages of `existing` are kept unless the table has
/// a new translation for them. The metadata of `existing` is kept
/// too, with the language and revision date updated.
pub fn create_catalog(table: &TranslationTable, locale: &str, existing: Option<Catalog>) -> Catalog {
    // msgid -> (msgstr, source), sorted by msgid.
    let mut messages = BTreeMap::<String, (String, String)>::new();
    let mut metadata = match existing {
        Some(existing) => {
            for message in existing.messages() {
                if let Some(msgstr) = translation(message) {
                    messages.insert(
                        String::from(message.msgid()),
                        (String::from(msgstr), String::from(message.source())),
                    );
                }
            }
            existing.metadata
        }
        None => new_metadata(locale),
    };

    if let Some(idx) = table.locale_index(locale) {
        for row in table.rows() {
            let msgstr = &row.translations[idx];
            if msgstr.is_empty() {
                continue;
            }
            let entry = messages.entry(row.msgid.clone()).or_default();
            entry.0 = msgstr.clone();
            if !row.source.is_empty() {
                entry.1 = row.source.clone();
            }
        }
    }

    metadata.language = String::from(locale);
    metadata.po_revision_date = now();
    if metadata.language_team.is_empty() {
        if let Some(name) = locales::language_name(locale) {
            metadata.language_team = String::from(name);
        }
    }
    metadata.content_type = String::from("text/plain; charset=UTF-8");

    let mut catalog = Catalog::new(metadata);
    for (msgid, (msgstr, source)) in messages {
        catalog.append_or_update(
            Message::build_singular()
                .with_source(source)
                .with_msgid(msgid)
                .with_msgstr(msgstr)
                .done(),
        );
    }
    catalog
}

/// Write the PO and MO files for `locale`, creating directories as
/// needed.
pub fn write_catalog(locale_dir: &LocaleDir, locale: &str, catalog: &Catalog) -> anyhow::Result<()> {
    let po_path = locale_dir.po_path(locale);
    let mo_path = locale_dir.mo_path(locale);
    for path in [&po_path, &mo_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
    }

    po_file::write(catalog, &po_path)
        .with_context(|| format!("Could not write catalog to {}", po_path.display()))?;
    mo_file::write(catalog, &mo_path)
        .with_context(|| format!("Could not compile catalog to {}", mo_path.display()))?;
    Ok(())
}

/// Compile `table` into the locale tree. Returns the compiled
/// locales in column order.
pub fn compile(
    table: &TranslationTable,
    locale_dir: &LocaleDir,
    options: CompileOptions,
) -> anyhow::Result<Vec<String>> {
    let selected = select_locales(table, options.unknown_locales)?;

    let mut compiled = Vec::new();
    for locale in selected {
        let po_path = locale_dir.po_path(locale);
        let existing = if options.merge && po_path.exists() {
            Some(read_catalog(&po_path)?)
        } else {
            None
        };

        let catalog = create_catalog(table, locale, existing);
        write_catalog(locale_dir, locale, &catalog)?;
        tracing::info!(
            "Compiled {} messages for {locale} into {}",
            catalog.messages().count(),
            po_path.display()
        );
        compiled.push(String::from(locale));
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polib::message::MessageFlags;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn parse(csv: &str) -> TranslationTable {
        TranslationTable::from_reader(csv.as_bytes()).unwrap()
    }

    fn translations(catalog: &Catalog) -> Vec<(&str, &str)> {
        catalog
            .messages()
            .map(|msg| (msg.msgid(), msg.msgstr().unwrap()))
            .collect()
    }

    fn without_dates(path: &Path) -> anyhow::Result<String> {
        Ok(fs::read_to_string(path)?
            .lines()
            .filter(|line| !line.contains("-Date:"))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    const TABLE: &str = "msgid,source,en_UK,es_ES\n\
                         Send,main.py:1,Send,Enviar\n\
                         Receive,main.py:2,Receive,\n\
                         Amount,main.py:3,Amount,Cantidad\n";

    #[test]
    fn test_select_locales() {
        let table = parse("msgid,en_UK,xx_XX,ko_KR\n");
        assert_eq!(
            select_locales(&table, UnknownLocalePolicy::Warn).unwrap(),
            &["en_UK", "ko_KR"]
        );
        assert_eq!(
            select_locales(&table, UnknownLocalePolicy::Ignore).unwrap(),
            &["en_UK", "ko_KR"]
        );
        assert!(select_locales(&table, UnknownLocalePolicy::Error).is_err());
    }

    #[test]
    fn test_select_locales_nothing_to_compile() {
        let table = parse("msgid,en,fr\nHello,Hello,Bonjour\n");
        let err = select_locales(&table, UnknownLocalePolicy::Ignore).unwrap_err();
        assert!(err.to_string().starts_with("Nothing to compile"));
    }

    #[test]
    fn test_create_catalog() {
        let table = parse(TABLE);
        let catalog = create_catalog(&table, "es_ES", None);

        assert_eq!(catalog.metadata.language, "es_ES");
        assert_eq!(catalog.metadata.language_team, "Spanish");
        assert_eq!(
            translations(&catalog),
            &[("Amount", "Cantidad"), ("Send", "Enviar")]
        );
        assert_eq!(
            catalog.find_message(None, "Send", None).unwrap().source(),
            "main.py:1"
        );
    }

    #[test]
    fn test_create_catalog_merges_existing() {
        let mut existing = Catalog::new(new_metadata("es_ES"));
        existing.metadata.project_id_version = String::from("Electrum 4.0");
        for (msgid, msgstr) in [("Send", "Mandar"), ("Wallet", "Cartera"), ("Fee", "")] {
            existing.append_or_update(
                Message::build_singular()
                    .with_msgid(String::from(msgid))
                    .with_msgstr(String::from(msgstr))
                    .done(),
            );
        }
        let mut flags = MessageFlags::new();
        flags.add_flag("fuzzy");
        existing.append_or_update(
            Message::build_singular()
                .with_msgid(String::from("Label"))
                .with_msgstr(String::from("Etiqueta?"))
                .with_flags(flags)
                .done(),
        );

        let catalog = create_catalog(&parse(TABLE), "es_ES", Some(existing));
        assert_eq!(catalog.metadata.project_id_version, "Electrum 4.0");
        assert_eq!(
            translations(&catalog),
            &[("Amount", "Cantidad"), ("Send", "Enviar"), ("Wallet", "Cartera")]
        );
    }

    #[test]
    fn test_compile_round_trip() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        let table = parse(
            "msgid,source,ja_JP\n\
             Send,a.py:1,送信\n\
             \"Two\nlines\",a.py:2,\"二\n行\"\n\
             \"Quote \"\"this\"\"\",a.py:3,\"「これ」を引用\"\n",
        );

        let compiled = compile(&table, &locale_dir, CompileOptions::default())?;
        assert_eq!(compiled, &["ja_JP"]);

        let catalog = read_catalog(&locale_dir.po_path("ja_JP"))?;
        assert_eq!(
            translations(&catalog),
            &[
                ("Quote \"this\"", "「これ」を引用"),
                ("Send", "送信"),
                ("Two\nlines", "二\n行"),
            ]
        );
        assert!(locale_dir.mo_path("ja_JP").is_file());
        Ok(())
    }

    #[test]
    fn test_compile_writes_mo_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        compile(&parse(TABLE), &locale_dir, CompileOptions::default())?;

        let mo = fs::read(locale_dir.mo_path("es_ES"))?;
        assert!(mo.len() > 4);
        let magic = [mo[0], mo[1], mo[2], mo[3]];
        assert!(magic == [0xde, 0x12, 0x04, 0x95] || magic == [0x95, 0x04, 0x12, 0xde]);
        Ok(())
    }

    #[test]
    fn test_compile_is_idempotent() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        let table = parse(TABLE);

        compile(&table, &locale_dir, CompileOptions::default())?;
        let first = without_dates(&locale_dir.po_path("es_ES"))?;
        compile(&table, &locale_dir, CompileOptions::default())?;
        let second = without_dates(&locale_dir.po_path("es_ES"))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_compile_filters_columns() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        let table = parse("msgid,en_UK,xx_XX\nHello,Hello,Xello\n");

        let compiled = compile(&table, &locale_dir, CompileOptions::default())?;
        assert_eq!(compiled, &["en_UK"]);
        assert!(locale_dir.po_path("en_UK").is_file());
        assert!(!locale_dir.po_path("xx_XX").exists());
        assert!(!locale_dir.mo_path("xx_XX").exists());
        Ok(())
    }

    #[test]
    fn test_compile_nothing_to_compile() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        let table = parse("msgid,fr_FR\nHello,Bonjour\n");

        assert!(compile(&table, &locale_dir, CompileOptions::default()).is_err());
        assert_eq!(fs::read_dir(tmpdir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_compile_skips_malformed_rows() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        let table = parse(
            "msgid,ko_KR\n\
             Send,보내기\n\
             Broken,row,with,extra,delimiters\n\
             Receive,받기\n",
        );

        compile(&table, &locale_dir, CompileOptions::default())?;
        let catalog = read_catalog(&locale_dir.po_path("ko_KR"))?;
        assert_eq!(translations(&catalog), &[("Receive", "받기"), ("Send", "보내기")]);
        Ok(())
    }

    #[test]
    fn test_compile_without_merge() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let locale_dir = LocaleDir::new(tmpdir.path(), "electrum");
        compile(
            &parse("msgid,vi_VN\nOld,Cũ\n"),
            &locale_dir,
            CompileOptions::default(),
        )?;

        let table = parse("msgid,vi_VN\nNew,Mới\n");
        compile(&table, &locale_dir, CompileOptions::default())?;
        let merged = read_catalog(&locale_dir.po_path("vi_VN"))?;
        assert_eq!(translations(&merged), &[("New", "Mới"), ("Old", "Cũ")]);

        let options = CompileOptions {
            merge: false,
            ..CompileOptions::default()
        };
        compile(&table, &locale_dir, options)?;
        let fresh = read_catalog(&locale_dir.po_path("vi_VN"))?;
        assert_eq!(translations(&fresh), &[("New", "Mới")]);
        Ok(())
    }
}
