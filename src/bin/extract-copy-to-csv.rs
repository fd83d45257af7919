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

//! Collect the translations of a locale tree into one CSV file.
//!
//! Every `<lang>/<domain>.po` file under the root directory becomes
//! a column of the CSV file, so translations can be reviewed side by
//! side.

use anyhow::bail;
use clap::Parser;
use po_csv_helpers::harvest::{find_po_files, harvest};
use po_csv_helpers::DEFAULT_DOMAIN;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The file to which the results are written.
    #[arg(id = "csv-file")]
    csv_file: PathBuf,
    /// Directory searched for PO files.
    #[arg(long, default_value = "locale")]
    root_dir: PathBuf,
    /// Name of the PO files.
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    domain: String,
}

fn main() -> anyhow::Result<()> {
    po_csv_helpers::init_logging();
    let args = Args::parse();
    extract_copy_to_csv(&args.root_dir, &args.domain, &args.csv_file)
}

fn extract_copy_to_csv(root_dir: &Path, domain: &str, csv_file: &Path) -> anyhow::Result<()> {
    let files = find_po_files(root_dir, domain)?;
    if files.is_empty() {
        bail!("No {domain}.po files found under {}", root_dir.display());
    }
    let table = harvest(&files)?;
    table.write_to_path(csv_file)?;
    tracing::info!(
        "{} rows for {} languages saved to {}",
        table.len(),
        table.locales().len(),
        csv_file.display()
    );
    Ok(())
}
