use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

const STANDARD_ALIASES: &[(&str, &str)] = &[
    ("boehringer ingelheim rcv & co", "Boehringer Ingelheim"),
    ("boehringer ingelheim rcv", "Boehringer Ingelheim"),
    ("magistrat wien-mba f.d. 21. bezirk", "Magistrat Wien"),
    ("magistrat wien", "Magistrat Wien"),
    ("wiener linien gmbh & co", "Wiener Linien"),
    ("magenta telekom", "Magenta Telekom"),
    ("magenta", "Magenta Telekom"),
];

const STANDARD_LEGAL_SUFFIXES: &[&str] = &[
    "gmbh",
    "kg",
    "kgaa",
    "ag",
    "se",
    "llc",
    "inc",
    "corp",
    "corporation",
    "ltd",
    "limited",
    "plc",
    "bv",
    "nv",
    "oy",
    "ab",
    "aps",
    "as",
    "co",
    "company",
    "rcv",
    "ohg",
    "gbr",
    "ev",
    "eg",
    "stg",
];

/// A single trigger phrase and the display name it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub key: String,
    pub canonical: String,
}

/// Ordered alias lookup. Keys are stored lower-cased but otherwise verbatim,
/// so a key like `"ams "` only matches the word on its own. The first key
/// that prefixes the lookup value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new<I>(entries: I) -> Result<Self, RulesError>
    where
        I: IntoIterator<Item = AliasEntry>,
    {
        let mut normalized = Vec::new();
        for (position, entry) in entries.into_iter().enumerate() {
            let key = entry.key.to_lowercase();
            if key.trim().is_empty() {
                return Err(RulesError::BlankAliasKey { position });
            }

            let canonical = entry.canonical.trim().to_string();
            if canonical.is_empty() {
                return Err(RulesError::BlankCanonical { key });
            }

            normalized.push(AliasEntry { key, canonical });
        }

        Ok(Self {
            entries: normalized,
        })
    }

    pub fn standard() -> Self {
        Self {
            entries: STANDARD_ALIASES
                .iter()
                .map(|(key, canonical)| AliasEntry {
                    key: (*key).to_string(),
                    canonical: (*canonical).to_string(),
                })
                .collect(),
        }
    }

    /// Returns the canonical value of the first entry whose key prefixes
    /// `lowered`. Callers pass an already lower-cased, trimmed name.
    pub fn resolve(&self, lowered: &str) -> Option<&AliasEntry> {
        self.entries
            .iter()
            .find(|entry| lowered.starts_with(entry.key.as_str()))
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Corporate-form tokens removed as whole words during canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalSuffixList {
    tokens: Vec<String>,
}

impl LegalSuffixList {
    pub fn new<I, S>(tokens: I) -> Result<Self, RulesError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for (position, token) in tokens.into_iter().enumerate() {
            let token = token.as_ref().trim().to_lowercase();
            if token.is_empty() {
                return Err(RulesError::BlankSuffix { position });
            }
            if !normalized.contains(&token) {
                normalized.push(token);
            }
        }

        Ok(Self { tokens: normalized })
    }

    pub fn standard() -> Self {
        Self {
            tokens: STANDARD_LEGAL_SUFFIXES
                .iter()
                .map(|token| (*token).to_string())
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Case-insensitive whole-word alternation over every token, or `None`
    /// when the list is empty.
    pub(crate) fn pattern(&self) -> Result<Option<Regex>, RulesError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let alternation = self
            .tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");

        RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(RulesError::from)
    }
}

/// The configuration tables a [`super::NameNormalizer`] is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationRules {
    pub aliases: AliasTable,
    pub legal_suffixes: LegalSuffixList,
}

impl NormalizationRules {
    pub fn new(aliases: AliasTable, legal_suffixes: LegalSuffixList) -> Self {
        Self {
            aliases,
            legal_suffixes,
        }
    }

    pub fn standard() -> Self {
        Self::new(AliasTable::standard(), LegalSuffixList::standard())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses a JSON rules document. An omitted `legal_suffixes` array keeps
    /// the built-in list; an omitted `aliases` array yields no aliases.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RulesError> {
        let document: RulesDocument = serde_json::from_reader(reader)?;
        let aliases = AliasTable::new(document.aliases)?;
        let legal_suffixes = match document.legal_suffixes {
            Some(tokens) => LegalSuffixList::new(tokens)?,
            None => LegalSuffixList::standard(),
        };

        Ok(Self::new(aliases, legal_suffixes))
    }
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Deserialize)]
struct RulesDocument {
    #[serde(default)]
    aliases: Vec<AliasEntry>,
    #[serde(default)]
    legal_suffixes: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read normalization rules: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid normalization rules JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("alias entry {position} has a blank key")]
    BlankAliasKey { position: usize },
    #[error("alias '{key}' maps to a blank canonical name")]
    BlankCanonical { key: String },
    #[error("legal suffix {position} is blank")]
    BlankSuffix { position: usize },
    #[error("legal suffixes do not form a valid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
