use paperflow::correspondents::{
    slugify, AliasEntry, AliasTable, LegalSuffixList, NameNormalizer, NormalizationRules,
    MAX_SLUG_LEN, UNKNOWN_CORRESPONDENT,
};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

fn standard() -> NameNormalizer {
    NameNormalizer::standard().expect("standard rules compile")
}

fn slug_is_well_formed(slug: &str) -> bool {
    if slug.len() > MAX_SLUG_LEN {
        return false;
    }
    if slug.is_empty() {
        return true;
    }
    slug.split('-').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
    })
}

#[test]
fn documented_scenarios_hold() {
    let normalizer = standard();

    assert_eq!(
        normalizer.normalize("Boehringer Ingelheim RCV & Co"),
        "Boehringer Ingelheim"
    );
    assert_eq!(normalizer.normalize("Acme GmbH & Co"), "Acme");
    assert_eq!(normalizer.normalize(""), UNKNOWN_CORRESPONDENT);
    assert_eq!(normalizer.normalize_value(&json!(null)), UNKNOWN_CORRESPONDENT);
    assert_eq!(slugify("Magenta Telekom"), "magenta-telekom");

    let canonical = normalizer.normalize("Ärger GmbH");
    assert_eq!(canonical, "Ärger");
    assert_eq!(slugify(&canonical), "arger");
}

#[test]
fn every_alias_key_resolves_with_trailing_noise() {
    let normalizer = standard();
    let rules = NormalizationRules::standard();

    for entry in rules.aliases.entries() {
        let expected = rules
            .aliases
            .resolve(&entry.key)
            .map(|first| first.canonical.clone())
            .expect("key resolves to itself or an earlier entry");
        let raw = format!("  {} Rechnung Nr. 2024-11 ", entry.key.to_uppercase());
        assert_eq!(normalizer.normalize(&raw), expected, "{raw}");
    }
}

#[test]
fn normalization_is_deterministic_and_stable() {
    let normalizer = standard();
    let inputs = [
        "Wiener Stadtwerke GmbH",
        "Smith & Wesson Inc.",
        "Bauer and Söhne KG +",
        "  fidelity   national, LTD ",
        "Österreichische Post AG",
    ];

    for input in inputs {
        let first = normalizer.normalize(input);
        assert_eq!(normalizer.normalize(input), first);
        assert_ne!(first, UNKNOWN_CORRESPONDENT, "{input}");
        assert_eq!(normalizer.normalize(&first), first, "{input} -> {first}");
        assert!(slug_is_well_formed(&slugify(&first)), "{first}");
    }
}

#[test]
fn worked_examples_strip_connectors_and_suffixes() {
    let normalizer = standard();
    assert_eq!(normalizer.normalize("Smith & Wesson Inc."), "Smith Wesson");
    assert_eq!(normalizer.normalize("Bauer and Söhne KG +"), "Bauer Söhne");
    assert_eq!(
        normalizer.normalize("  fidelity   national, LTD "),
        "Fidelity National"
    );
    assert_eq!(normalizer.normalize("Österreichische Post AG"), "Österreichische Post");
}

#[test]
fn slugs_are_case_insensitive_and_bounded() {
    let names = [
        "Magenta Telekom",
        "ÖBB-Personenverkehr",
        "A very long correspondent name that keeps going well past fifty characters",
        "   ",
        "###",
    ];

    for name in names {
        let slug = slugify(name);
        assert!(slug_is_well_formed(&slug), "{name:?} -> {slug:?}");
        assert_eq!(slugify(&name.to_uppercase()), slug);
        assert_eq!(slugify(&name.to_lowercase()), slug);
    }
}

#[test]
fn fixture_rules_can_be_injected_from_json() {
    let rules = NormalizationRules::from_reader(Cursor::new(
        r#"{
            "aliases": [
                { "key": "Arbeitsmarktservice", "canonical": "AMS" },
                { "key": "ams ", "canonical": "AMS" }
            ],
            "legal_suffixes": ["ev"]
        }"#,
    ))
    .expect("fixture rules parse");
    let normalizer = NameNormalizer::new(rules).expect("fixture rules compile");

    assert_eq!(normalizer.normalize("ARBEITSMARKTSERVICE Wien"), "AMS");
    assert_eq!(normalizer.normalize("Sportverein Hietzing eV"), "Sportverein Hietzing");
    assert_eq!(normalizer.normalize("Acme GmbH"), "Acme GmbH");
    assert_eq!(normalizer.normalize("AMS Wien"), "AMS");
    assert_eq!(normalizer.normalize("amsterdam hafen"), "Amsterdam Hafen");
}

#[test]
fn empty_tables_only_clean_punctuation() {
    let rules = NormalizationRules::new(
        AliasTable::new(Vec::<AliasEntry>::new()).expect("empty aliases"),
        LegalSuffixList::new(Vec::<String>::new()).expect("empty suffixes"),
    );
    let normalizer = NameNormalizer::new(rules).expect("empty rules compile");

    assert_eq!(normalizer.normalize("magenta, telekom & co."), "Magenta Telekom Co");
}

#[test]
fn shared_normalizer_is_safe_across_threads() {
    let normalizer = Arc::new(standard());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let normalizer = Arc::clone(&normalizer);
            thread::spawn(move || normalizer.normalize("Acme GmbH & Co"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), "Acme");
    }
}
