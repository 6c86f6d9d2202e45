use super::rules::{NormalizationRules, RulesError};
use super::slug::slugify;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Fallback display name for inputs that carry no usable name.
pub const UNKNOWN_CORRESPONDENT: &str = "Unknown";

/// Canonical identity of a correspondent as handed to downstream records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrespondentIdentity {
    pub raw: Option<String>,
    pub canonical: String,
    pub slug: String,
}

/// Canonicalizes free-text correspondent names against injected alias and
/// legal-suffix tables. Every operation is total.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    rules: NormalizationRules,
    legal_suffix_pattern: Option<Regex>,
}

impl NameNormalizer {
    pub fn new(rules: NormalizationRules) -> Result<Self, RulesError> {
        let legal_suffix_pattern = rules.legal_suffixes.pattern()?;
        Ok(Self {
            rules,
            legal_suffix_pattern,
        })
    }

    pub fn standard() -> Result<Self, RulesError> {
        Self::new(NormalizationRules::standard())
    }

    pub fn rules(&self) -> &NormalizationRules {
        &self.rules
    }

    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim_matches(is_blank);
        if trimmed.is_empty() {
            return UNKNOWN_CORRESPONDENT.to_string();
        }

        let lowered = trimmed.to_lowercase();
        if let Some(entry) = self.rules.aliases.resolve(&lowered) {
            debug!(raw, alias = %entry.key, canonical = %entry.canonical, "alias match");
            return entry.canonical.clone();
        }

        let cleaned = replace_separators(trimmed);
        let cleaned = drop_ampersands(&cleaned);
        let cleaned = drop_and_connectors(&cleaned);
        let cleaned = collapse_whitespace(&cleaned);
        let cleaned = self.strip_legal_suffixes(&cleaned);
        let cleaned = strip_trailing_connector(&cleaned);
        let canonical = title_case(&cleaned);

        if canonical.trim_matches(is_blank).is_empty() {
            debug!(raw, "nothing left after normalization");
            return UNKNOWN_CORRESPONDENT.to_string();
        }

        debug!(raw, canonical = %canonical, "normalized correspondent");
        canonical
    }

    /// Accepts any JSON value; anything other than a string is unknown.
    pub fn normalize_value(&self, raw: &Value) -> String {
        match raw.as_str() {
            Some(name) => self.normalize(name),
            None => UNKNOWN_CORRESPONDENT.to_string(),
        }
    }

    pub fn resolve(&self, raw: &str) -> CorrespondentIdentity {
        let canonical = self.normalize(raw);
        let slug = slugify(&canonical);
        CorrespondentIdentity {
            raw: Some(raw.to_string()),
            canonical,
            slug,
        }
    }

    pub fn resolve_value(&self, raw: &Value) -> CorrespondentIdentity {
        let canonical = self.normalize_value(raw);
        let slug = slugify(&canonical);
        CorrespondentIdentity {
            raw: raw.as_str().map(str::to_string),
            canonical,
            slug,
        }
    }

    fn strip_legal_suffixes(&self, value: &str) -> String {
        match &self.legal_suffix_pattern {
            Some(pattern) => collapse_whitespace(&pattern.replace_all(value, "")),
            None => value.to_string(),
        }
    }
}

fn ampersand_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[\s\x{FEFF}]*&[\s\x{FEFF}]*").expect("ampersand pattern compiles")
    })
}

fn and_connector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)[\s\x{FEFF}]+and[\s\x{FEFF}]+").expect("connector pattern compiles")
    })
}

fn trailing_connector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[\s\x{FEFF}]*[&+][\s\x{FEFF}]*$").expect("trailing pattern compiles")
    })
}

fn replace_separators(value: &str) -> String {
    value.replace(['.', ','], " ")
}

fn drop_ampersands(value: &str) -> String {
    ampersand_pattern().replace_all(value, " ").into_owned()
}

fn drop_and_connectors(value: &str) -> String {
    and_connector_pattern().replace_all(value, " ").into_owned()
}

/// Unicode whitespace plus the byte-order mark, which `char::is_whitespace`
/// leaves out. Exported document metadata often starts with one.
fn is_blank(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{feff}'
}

fn collapse_whitespace(value: &str) -> String {
    value
        .split(is_blank)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// Only one trailing connector is removed.
fn strip_trailing_connector(value: &str) -> String {
    trailing_connector_pattern()
        .replace(value, "")
        .trim_matches(is_blank)
        .to_string()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Upper-cases the first character of every word. The rest of each word is
/// left as written, so "ACME" and "McKinsey" keep their inner casing.
fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if is_word_char(ch) {
            if in_word {
                result.push(ch);
            } else {
                result.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(ch);
            in_word = false;
        }
    }
    result
}
