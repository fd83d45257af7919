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

//! The set of locales we know how to compile.

/// Supported locale codes and their English display names.
///
/// CSV columns are matched against these codes. The order here is
/// also the column order of freshly generated CSV files.
pub const SUPPORTED_LOCALES: &[(&str, &str)] = &[
    ("en_UK", "English"),
    ("ko_KR", "Korean"),
    ("ja_JP", "Japanese"),
    ("zh_CN", "Chinese Simplified"),
    ("vi_VN", "Vietnamese"),
    ("es_ES", "Spanish"),
    ("pt_PT", "Portuguese"),
    ("id_ID", "Indonesian"),
    ("tr_TR", "Turkish"),
];

/// Returns true if `code` is one of the [`SUPPORTED_LOCALES`].
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LOCALES.iter().any(|(known, _)| *known == code)
}

/// Iterate over the supported locale codes.
pub fn supported_codes() -> impl Iterator<Item = &'static str> {
    SUPPORTED_LOCALES.iter().map(|(code, _)| *code)
}

/// English display name of a supported locale.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// What to do with a CSV column whose header is not a supported
/// locale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnknownLocalePolicy {
    /// Drop the column without saying anything.
    Ignore,
    /// Drop the column and log a warning.
    #[default]
    Warn,
    /// Refuse to compile anything.
    Error,
}
