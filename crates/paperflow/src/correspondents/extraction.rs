use super::normalizer::UNKNOWN_CORRESPONDENT;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Names an AI model sometimes returns as the sender although they describe
/// the document itself.
const DOCUMENT_TYPE_NAMES: &[&str] = &[
    "invoice",
    "letter",
    "contract",
    "receipt",
    "statement",
    "document",
];

/// AI metadata extraction output for a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub correspondent: Option<CorrespondentCandidate>,
    #[serde(default)]
    pub document_analysis: Option<DocumentAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrespondentCandidate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrespondentSource {
    Ai,
    CategoryFallback,
    Unknown,
    RejectedDocumentType,
}

impl CorrespondentSource {
    pub fn label(&self) -> &'static str {
        match self {
            CorrespondentSource::Ai => "ai",
            CorrespondentSource::CategoryFallback => "category_fallback",
            CorrespondentSource::Unknown => "unknown",
            CorrespondentSource::RejectedDocumentType => "rejected_document_type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedCorrespondent {
    pub name: String,
    pub source: CorrespondentSource,
}

/// Chooses the raw correspondent name for a document before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrespondentExtractor {
    min_confidence: f64,
}

impl Default for CorrespondentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

impl CorrespondentExtractor {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Prefers a confident AI candidate, then the document category, then
    /// [`UNKNOWN_CORRESPONDENT`]. A pick that is really a document type is
    /// replaced by [`UNKNOWN_CORRESPONDENT`].
    pub fn select(&self, analysis: &AnalysisResult) -> ExtractedCorrespondent {
        let candidate = analysis.correspondent.as_ref().and_then(|candidate| {
            let name = non_blank(candidate.name.as_deref())?;
            (candidate.confidence > self.min_confidence).then_some((name, candidate))
        });
        let category = analysis
            .document_analysis
            .as_ref()
            .and_then(|analysis| non_blank(analysis.category.as_deref()));

        let (name, source) = match (candidate, category) {
            (Some((name, candidate)), _) => {
                info!(
                    correspondent = name,
                    confidence = candidate.confidence,
                    note = candidate.note.as_deref().unwrap_or_default(),
                    "using AI-extracted correspondent"
                );
                (name.to_string(), CorrespondentSource::Ai)
            }
            (None, Some(category)) => {
                warn!(
                    category,
                    "falling back to document category as correspondent"
                );
                (category.to_string(), CorrespondentSource::CategoryFallback)
            }
            (None, None) => {
                warn!("no correspondent information found");
                (
                    UNKNOWN_CORRESPONDENT.to_string(),
                    CorrespondentSource::Unknown,
                )
            }
        };

        if is_document_type(&name) {
            warn!(correspondent = %name, "correspondent is a document type, not a sender");
            return ExtractedCorrespondent {
                name: UNKNOWN_CORRESPONDENT.to_string(),
                source: CorrespondentSource::RejectedDocumentType,
            };
        }

        ExtractedCorrespondent { name, source }
    }
}

pub fn is_document_type(name: &str) -> bool {
    let lowered = name.to_lowercase();
    DOCUMENT_TYPE_NAMES.contains(&lowered.as_str())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let confidence = match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or_default(),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or_default(),
        _ => 0.0,
    };

    Ok(if confidence.is_finite() { confidence } else { 0.0 })
}
