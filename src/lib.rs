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

//! Helpers for moving translations between gettext catalogs and CSV.
//!
//! Translators are often more comfortable in a spreadsheet than in a
//! PO editor. The functions here implement a small round-trip
//! workflow:
//!
//! 1. Extract translatable strings from source code into a CSV file
//!    with one column per target language ([`extract`], [`diff`]).
//! 2. Let translators fill in the columns.
//! 3. Compile the completed CSV back into PO and MO files
//!    ([`compile`]).
//!
//! Existing catalogs can also be collected into a single CSV file
//! for review ([`harvest`]) and refreshed against new sources
//! ([`update`]).

pub mod compile;
pub mod diff;
pub mod extract;
pub mod harvest;
pub mod locales;
pub mod table;
pub mod update;

use anyhow::{anyhow, Context};
use polib::catalog::Catalog;
use polib::message::{Message, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file;
use std::path::{Path, PathBuf};

/// Default gettext domain, used for file names in the locale tree.
pub const DEFAULT_DOMAIN: &str = "electrum";

/// Name of the template written at the root of the locale tree.
pub const TEMPLATE_FILE_NAME: &str = "messages.pot";

/// Build standard catalog metadata for `language`.
///
/// Use an empty `language` for templates.
pub fn new_metadata(language: &str) -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    metadata.language = String::from(language);
    metadata.pot_creation_date = now();
    metadata.mime_version = String::from("1.0");
    metadata.content_type = String::from("text/plain; charset=UTF-8");
    metadata.content_transfer_encoding = String::from("8bit");
    metadata
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Current local time formatted for catalog headers.
pub(crate) fn now() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Parse the PO file at `path`.
pub fn read_catalog(path: &Path) -> anyhow::Result<Catalog> {
    po_file::parse(path)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Could not parse {:?} as PO file", path))
}

/// Add `msgid` to `catalog`, appending `source` to the sources of an
/// existing message with the same `msgid`.
pub fn add_message(catalog: &mut Catalog, msgid: &str, source: &str) {
    let sources = match catalog.find_message(None, msgid, None) {
        Some(msg) if !msg.source().is_empty() => format!("{}\n{}", msg.source(), source),
        _ => String::from(source),
    };
    let message = Message::build_singular()
        .with_source(sources)
        .with_msgid(String::from(msgid))
        .done();
    catalog.append_or_update(message);
}

/// Returns the usable translation of `message`.
///
/// Fuzzy messages and empty `msgstr` fields count as untranslated.
pub fn translation(message: &dyn MessageView) -> Option<&str> {
    if message.flags().is_fuzzy() {
        return None;
    }
    message.msgstr().ok().filter(|msgstr| !msgstr.is_empty())
}

/// Layout of a gettext locale tree:
///
/// ```text
/// <root>/messages.pot
/// <root>/<lang>/<domain>.po
/// <root>/<lang>/LC_MESSAGES/<domain>.mo
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleDir {
    root: PathBuf,
    domain: String,
}

impl LocaleDir {
    pub fn new(root: impl Into<PathBuf>, domain: &str) -> Self {
        Self {
            root: root.into(),
            domain: String::from(domain),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(TEMPLATE_FILE_NAME)
    }

    pub fn po_path(&self, language: &str) -> PathBuf {
        self.root
            .join(language)
            .join(format!("{}.po", self.domain))
    }

    pub fn mo_path(&self, language: &str) -> PathBuf {
        self.root
            .join(language)
            .join("LC_MESSAGES")
            .join(format!("{}.mo", self.domain))
    }
}
