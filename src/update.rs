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

//! Refresh the catalogs of a locale tree from a new template.
//!
//! This is the equivalent of running `msgmerge --no-fuzzy-matching`
//! followed by `msgfmt` for every language.

use crate::compile::write_catalog;
use crate::{new_metadata, read_catalog, LocaleDir};
use anyhow::Context;
use polib::catalog::Catalog;
use polib::message::{Message, MessageFlags};
use polib::po_file;
use std::collections::HashMap;
use std::fs;

/// Returns a catalog with exactly the messages of `template`, in
/// template order, carrying over the translations of `existing`.
///
/// Messages of `existing` which are no longer in `template` are
/// dropped. The metadata of `existing` is kept.
pub fn update_catalog(template: &Catalog, existing: Catalog, language: &str) -> Catalog {
    let mut previous = HashMap::<String, (String, MessageFlags, String)>::new();
    for message in existing.messages() {
        let msgstr = message.msgstr().unwrap_or_default();
        previous.insert(
            String::from(message.msgid()),
            (
                String::from(msgstr),
                message.flags().clone(),
                String::from(message.comments()),
            ),
        );
    }

    let mut metadata = existing.metadata;
    metadata.language = String::from(language);
    metadata.pot_creation_date = template.metadata.pot_creation_date.clone();
    let mut catalog = Catalog::new(metadata);

    let mut kept = 0;
    for message in template.messages() {
        let (msgstr, flags, comments) = match previous.remove(message.msgid()) {
            Some(carried) => {
                kept += 1;
                carried
            }
            None => (String::new(), MessageFlags::new(), String::new()),
        };
        catalog.append_or_update(
            Message::build_singular()
                .with_comments(comments)
                .with_source(String::from(message.source()))
                .with_flags(flags)
                .with_msgid(String::from(message.msgid()))
                .with_msgstr(msgstr)
                .done(),
        );
    }
    tracing::debug!(
        "{language}: kept {kept} messages, added {}, dropped {} obsolete",
        template.messages().count() - kept,
        previous.len()
    );
    catalog
}

/// Write `template` to the root of `locale_dir`, then update the PO
/// and MO files of every language found there.
///
/// Every directory of `locale_dir` is a language, except for names
/// starting with `messages`. Returns the updated languages.
pub fn update_locales(template: &Catalog, locale_dir: &LocaleDir) -> anyhow::Result<Vec<String>> {
    let root = locale_dir.root();
    fs::create_dir_all(root).with_context(|| format!("Could not create {}", root.display()))?;
    let template_path = locale_dir.template_path();
    po_file::write(template, &template_path)
        .with_context(|| format!("Could not write template to {}", template_path.display()))?;

    let mut languages = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Could not read {}", root.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(language) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        if language.starts_with("messages") {
            continue;
        }
        languages.push(language);
    }
    languages.sort();

    for language in &languages {
        let po_path = locale_dir.po_path(language);
        let existing = if po_path.exists() {
            read_catalog(&po_path)?
        } else {
            tracing::info!("Creating {}", po_path.display());
            Catalog::new(new_metadata(language))
        };
        let catalog = update_catalog(template, existing, language);
        write_catalog(locale_dir, language, &catalog)?;
        tracing::info!("Updated {}", po_path.display());
    }
    Ok(languages)
}
