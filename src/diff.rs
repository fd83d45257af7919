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

//! Find the messages which still need a translation.

use crate::{new_metadata, translation};
use polib::catalog::Catalog;
use polib::message::Message;
use std::collections::HashMap;

/// Map each translated `msgid` of `reference` to its `msgstr`.
pub fn translated_messages(reference: &Catalog) -> HashMap<&str, &str> {
    reference
        .messages()
        .filter_map(|msg| Some((msg.msgid(), translation(msg)?)))
        .collect()
}

/// Returns the messages of `template` without a translation in
/// `reference`.
///
/// Messages missing from `reference`, or present with an empty or
/// fuzzy `msgstr`, are kept. The result keeps the order and the
/// sources of `template`.
pub fn untranslated(template: &Catalog, reference: &Catalog) -> Catalog {
    let translated = translated_messages(reference);
    let mut catalog = Catalog::new(new_metadata(&template.metadata.language));
    for message in template.messages() {
        if translated.contains_key(message.msgid()) {
            continue;
        }
        catalog.append_or_update(
            Message::build_singular()
                .with_source(String::from(message.source()))
                .with_msgid(String::from(message.msgid()))
                .done(),
        );
    }
    tracing::info!(
        "{} of {} messages need a translation",
        catalog.messages().count(),
        template.messages().count()
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::add_message;
    use polib::message::MessageFlags;
    use pretty_assertions::assert_eq;

    fn create_reference(translations: &[(&str, &str)]) -> Catalog {
        let mut catalog = Catalog::new(new_metadata("es_ES"));
        for (msgid, msgstr) in translations {
            let message = Message::build_singular()
                .with_msgid(String::from(*msgid))
                .with_msgstr(String::from(*msgstr))
                .done();
            catalog.append_or_update(message);
        }
        catalog
    }

    fn create_template(msgids: &[&str]) -> Catalog {
        let mut catalog = Catalog::new(new_metadata(""));
        for (idx, msgid) in msgids.iter().enumerate() {
            add_message(&mut catalog, msgid, &format!("main.py:{}", idx + 1));
        }
        catalog
    }

    fn msgids(catalog: &Catalog) -> Vec<&str> {
        catalog.messages().map(|msg| msg.msgid()).collect()
    }

    #[test]
    fn test_untranslated() {
        let reference = create_reference(&[("A", "x"), ("B", "")]);
        let template = create_template(&["A", "B", "C"]);
        let diff = untranslated(&template, &reference);
        assert_eq!(msgids(&diff), &["B", "C"]);
    }

    #[test]
    fn test_untranslated_keeps_template_order_and_sources() {
        let reference = create_reference(&[("Z", "z")]);
        let template = create_template(&["C", "A", "B"]);
        let diff = untranslated(&template, &reference);
        assert_eq!(msgids(&diff), &["C", "A", "B"]);
        assert_eq!(
            diff.find_message(None, "A", None).unwrap().source(),
            "main.py:2"
        );
    }

    #[test]
    fn test_untranslated_fuzzy() {
        let mut reference = create_reference(&[("A", "x")]);
        let mut flags = MessageFlags::new();
        flags.add_flag("fuzzy");
        reference.append_or_update(
            Message::build_singular()
                .with_msgid(String::from("B"))
                .with_msgstr(String::from("y?"))
                .with_flags(flags)
                .done(),
        );
        let template = create_template(&["A", "B"]);
        assert_eq!(msgids(&untranslated(&template, &reference)), &["B"]);
    }

    #[test]
    fn test_untranslated_everything_done() {
        let reference = create_reference(&[("A", "x"), ("B", "y")]);
        let template = create_template(&["A", "B"]);
        assert!(msgids(&untranslated(&template, &reference)).is_empty());
    }

    #[test]
    fn test_translated_messages() {
        let reference = create_reference(&[("A", "x"), ("B", "")]);
        let translated = translated_messages(&reference);
        assert_eq!(translated.len(), 1);
        assert_eq!(translated.get("A"), Some(&"x"));
    }
}
