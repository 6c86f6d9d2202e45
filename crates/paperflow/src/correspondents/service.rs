use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::extraction::{AnalysisResult, CorrespondentExtractor, CorrespondentSource};
use super::normalizer::{CorrespondentIdentity, NameNormalizer};
use super::rules::{NormalizationRules, RulesError};
use super::slug::slugify;
use super::storage::{StoragePathPlan, StoragePathPlanner};
use crate::config::NormalizationConfig;

/// Outcome of running extraction and normalization on one AI analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionOutcome {
    pub name: String,
    pub source: CorrespondentSource,
    pub canonical: String,
    pub slug: String,
}

/// Facade composing the normalizer, storage path planner, and extractor
/// over one shared set of rules.
pub struct CorrespondentService {
    normalizer: Arc<NameNormalizer>,
    planner: StoragePathPlanner,
    extractor: CorrespondentExtractor,
}

impl CorrespondentService {
    pub fn new(
        normalizer: Arc<NameNormalizer>,
        default_category: impl Into<String>,
        extractor: CorrespondentExtractor,
    ) -> Self {
        let planner = StoragePathPlanner::new(normalizer.clone(), default_category);
        Self {
            normalizer,
            planner,
            extractor,
        }
    }

    /// Builds the service from configuration, reading the rules file when
    /// one is configured.
    pub fn from_config(config: &NormalizationConfig) -> Result<Self, RulesError> {
        let rules = match &config.rules_path {
            Some(path) => NormalizationRules::from_path(path)?,
            None => NormalizationRules::standard(),
        };
        let normalizer = Arc::new(NameNormalizer::new(rules)?);

        Ok(Self::new(
            normalizer,
            config.default_category.clone(),
            CorrespondentExtractor::new(config.min_confidence),
        ))
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn planner(&self) -> &StoragePathPlanner {
        &self.planner
    }

    pub fn resolve(&self, raw: &Value) -> CorrespondentIdentity {
        self.normalizer.resolve_value(raw)
    }

    pub fn plan(&self, category: Option<&str>, raw: &str) -> StoragePathPlan {
        self.planner.plan(category, raw)
    }

    pub fn enrich_record(&self, record: Value) -> Value {
        self.planner.enrich_record(record)
    }

    pub fn extract(&self, analysis: &AnalysisResult) -> ExtractionOutcome {
        let selected = self.extractor.select(analysis);
        let canonical = self.normalizer.normalize(&selected.name);
        let slug = slugify(&canonical);

        ExtractionOutcome {
            name: selected.name,
            source: selected.source,
            canonical,
            slug,
        }
    }
}
