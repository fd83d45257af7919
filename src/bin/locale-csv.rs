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

//! Move translations between source code, CSV files and gettext
//! catalogs.
//!
//! - `create-csv` extracts the strings to translate into a CSV file,
//!   either all of them (`--new`) or only those missing from a
//!   reference PO file (`--diff`).
//! - `compile-po` turns a completed CSV file into PO and MO files.
//! - `update-po` refreshes every catalog of the locale tree against
//!   the current sources.

use anyhow::Context;
use clap::Parser;
use po_csv_helpers::compile::{compile, CompileOptions};
use po_csv_helpers::extract::{create_table, create_template, prefill, DEFAULT_EXTENSIONS};
use po_csv_helpers::locales::{self, UnknownLocalePolicy};
use po_csv_helpers::table::TranslationTable;
use po_csv_helpers::update::update_locales;
use po_csv_helpers::{diff, read_catalog, LocaleDir, DEFAULT_DOMAIN};
use polib::po_file;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    po_csv_helpers::init_logging();
    match Args::parse() {
        Args::CreateCsv {
            csv_file,
            mode,
            source,
            locales,
            locale_dir,
            domain,
            pot,
        } => {
            let locale_dir = locale_dir.map(|dir| LocaleDir::new(dir, &domain));
            create_csv(
                &csv_file,
                &mode,
                &source,
                &locales,
                locale_dir.as_ref(),
                pot.as_deref(),
            )?;
        }
        Args::CompilePo {
            csv_file,
            locale_dir,
            domain,
            unknown_locales,
            no_merge,
        } => {
            let options = CompileOptions {
                unknown_locales,
                merge: !no_merge,
            };
            compile_po(&csv_file, &LocaleDir::new(locale_dir, &domain), options)?;
        }
        Args::UpdatePo {
            source,
            locale_dir,
            domain,
        } => {
            let template = create_template(&source.source_dir, &source.extensions())?;
            update_locales(&template, &LocaleDir::new(locale_dir, &domain))?;
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
enum Args {
    /// Create a CSV file with the strings to translate.
    CreateCsv {
        /// The file to which the results are written.
        #[arg(id = "csv-file")]
        csv_file: PathBuf,
        #[command(flatten)]
        mode: CsvMode,
        #[command(flatten)]
        source: SourceArgs,
        /// Locale column to include; repeat for several. Defaults to
        /// all supported locales.
        #[arg(long = "locale", value_name = "CODE")]
        locales: Vec<String>,
        /// Fill the cells with the translations found in this locale
        /// tree.
        #[arg(long)]
        locale_dir: Option<PathBuf>,
        /// Name of the PO files in the locale tree.
        #[arg(long, default_value = DEFAULT_DOMAIN)]
        domain: String,
        /// Also write the extracted template to this file.
        #[arg(long, value_name = "POT_FILE")]
        pot: Option<PathBuf>,
    },
    /// Compile a CSV file into PO and MO files.
    CompilePo {
        /// The completed CSV file.
        #[arg(id = "csv-file")]
        csv_file: PathBuf,
        /// Directory where the PO and MO files are written.
        #[arg(long, default_value = "locale")]
        locale_dir: PathBuf,
        /// Name of the PO and MO files.
        #[arg(long, default_value = DEFAULT_DOMAIN)]
        domain: String,
        /// What to do with columns which are not a supported locale.
        #[arg(long, value_enum, default_value_t = UnknownLocalePolicy::Warn)]
        unknown_locales: UnknownLocalePolicy,
        /// Replace the PO files instead of merging into them.
        #[arg(long)]
        no_merge: bool,
    },
    /// Update the PO and MO files of every language from the sources.
    UpdatePo {
        #[command(flatten)]
        source: SourceArgs,
        /// Directory with one subdirectory per language.
        #[arg(long, default_value = "locale")]
        locale_dir: PathBuf,
        /// Name of the PO and MO files.
        #[arg(long, default_value = DEFAULT_DOMAIN)]
        domain: String,
    },
}

#[derive(Clone, Debug, clap::Args)]
#[group(required = true, multiple = false)]
struct CsvMode {
    /// Include every string found in the sources.
    #[arg(long)]
    new: bool,
    /// Include only the strings without a translation in REF_PO_FILE.
    #[arg(long, value_name = "REF_PO_FILE")]
    diff: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::Args)]
struct SourceArgs {
    /// Directory scanned for translatable strings.
    #[arg(long, default_value = ".")]
    source_dir: PathBuf,
    /// Extension of the files to scan; repeat for several. Defaults
    /// to `py` and `kv`.
    #[arg(long = "extension", value_name = "EXT")]
    extensions: Vec<String>,
}

impl SourceArgs {
    fn extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
        } else {
            self.extensions.clone()
        }
    }
}

/// Extracts the strings to translate and writes them to `csv_file`.
///
/// Nothing is written when there is nothing to translate.
fn create_csv(
    csv_file: &Path,
    mode: &CsvMode,
    source: &SourceArgs,
    columns: &[String],
    locale_dir: Option<&LocaleDir>,
    pot: Option<&Path>,
) -> anyhow::Result<()> {
    let template = create_template(&source.source_dir, &source.extensions())?;
    if let Some(pot) = pot {
        po_file::write(&template, pot)
            .with_context(|| format!("Writing template to {}", pot.display()))?;
    }

    let catalog = match &mode.diff {
        Some(reference) => diff::untranslated(&template, &read_catalog(reference)?),
        None => template,
    };

    let columns: Vec<String> = if columns.is_empty() {
        locales::supported_codes().map(String::from).collect()
    } else {
        for locale in columns.iter().filter(|locale| !locales::is_supported(locale)) {
            tracing::warn!("{locale:?} is not a supported locale, compile-po will skip it");
        }
        columns.to_vec()
    };
    let mut table = create_table(&catalog, &columns);
    if let Some(locale_dir) = locale_dir {
        prefill(&mut table, locale_dir)?;
    }

    save_into_csv(&table, csv_file)
}

fn save_into_csv(table: &TranslationTable, csv_file: &Path) -> anyhow::Result<()> {
    if table.is_empty() {
        tracing::warn!("{} not saved: nothing to translate", csv_file.display());
        return Ok(());
    }
    table.write_to_path(csv_file)?;
    tracing::info!("{} rows saved to {}", table.len(), csv_file.display());
    Ok(())
}

fn compile_po(csv_file: &Path, locale_dir: &LocaleDir, options: CompileOptions) -> anyhow::Result<()> {
    let table = TranslationTable::from_path(csv_file)?;
    let compiled = compile(&table, locale_dir, options)?;
    tracing::info!("Compiled {} catalogs: {}", compiled.len(), compiled.join(", "));
    Ok(())
}
