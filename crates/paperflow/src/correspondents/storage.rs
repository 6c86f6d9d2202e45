use super::normalizer::NameNormalizer;
use super::slug::slugify;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_STORAGE_CATEGORY: &str = "reference-documents";

/// Placeholder tail the document manager fills in per document.
const PATH_SUFFIX: &str = "{created_year}-{created_month}-{created_day}-{title}";

/// Where documents from one correspondent land and what the storage path
/// record is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoragePathPlan {
    pub category: String,
    pub correspondent_canonical: String,
    pub correspondent_slug: String,
    pub path_template: String,
    pub display_name: String,
}

pub struct StoragePathPlanner {
    normalizer: Arc<NameNormalizer>,
    default_category: String,
}

impl StoragePathPlanner {
    pub fn new(normalizer: Arc<NameNormalizer>, default_category: impl Into<String>) -> Self {
        Self {
            normalizer,
            default_category: default_category.into(),
        }
    }

    pub fn plan(&self, category: Option<&str>, raw_name: &str) -> StoragePathPlan {
        let canonical = self.normalizer.normalize(raw_name);
        self.plan_canonical(category, canonical)
    }

    /// Same as [`Self::plan`] for an untyped name; non-strings are unknown.
    pub fn plan_value(&self, category: Option<&str>, raw_name: &Value) -> StoragePathPlan {
        let canonical = self.normalizer.normalize_value(raw_name);
        self.plan_canonical(category, canonical)
    }

    /// Adds `correspondent_canonical`, `storage_path_template` and
    /// `storage_path_name` to a document record, keeping every other field.
    /// A non-object record is treated as empty.
    pub fn enrich_record(&self, record: Value) -> Value {
        let mut fields = match record {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        let category = fields.get("storage_category").and_then(Value::as_str);
        let raw_name = fields
            .get("correspondent_name")
            .cloned()
            .unwrap_or(Value::Null);
        let plan = self.plan_value(category, &raw_name);

        info!(
            raw = %raw_name,
            canonical = %plan.correspondent_canonical,
            slug = %plan.correspondent_slug,
            template = %plan.path_template,
            name = %plan.display_name,
            "storage path generated"
        );

        fields.insert(
            "correspondent_canonical".to_string(),
            Value::String(plan.correspondent_canonical),
        );
        fields.insert(
            "storage_path_template".to_string(),
            Value::String(plan.path_template),
        );
        fields.insert(
            "storage_path_name".to_string(),
            Value::String(plan.display_name),
        );
        Value::Object(fields)
    }

    fn plan_canonical(&self, category: Option<&str>, canonical: String) -> StoragePathPlan {
        let category = category
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(&self.default_category)
            .to_string();
        let slug = slugify(&canonical);

        StoragePathPlan {
            path_template: format!("{category}/{slug}/{PATH_SUFFIX}"),
            display_name: format!("{category} - {canonical}"),
            category,
            correspondent_canonical: canonical,
            correspondent_slug: slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn planner() -> StoragePathPlanner {
        let normalizer = NameNormalizer::standard().expect("standard rules compile");
        StoragePathPlanner::new(Arc::new(normalizer), DEFAULT_STORAGE_CATEGORY)
    }

    #[test]
    fn plan_composes_template_and_display_name() {
        let plan = planner().plan(Some("invoices"), "Magenta Telekom GmbH");

        assert_eq!(plan.category, "invoices");
        assert_eq!(plan.correspondent_canonical, "Magenta Telekom");
        assert_eq!(plan.correspondent_slug, "magenta-telekom");
        assert_eq!(
            plan.path_template,
            "invoices/magenta-telekom/{created_year}-{created_month}-{created_day}-{title}"
        );
        assert_eq!(plan.display_name, "invoices - Magenta Telekom");
    }

    #[test]
    fn blank_category_uses_default() {
        let planner = planner();
        assert_eq!(planner.plan(None, "Acme").category, "reference-documents");
        assert_eq!(planner.plan(Some("  "), "Acme").category, "reference-documents");

        let custom = StoragePathPlanner::new(
            Arc::new(NameNormalizer::standard().expect("rules")),
            "inbox",
        );
        assert_eq!(custom.plan(None, "Acme").display_name, "inbox - Acme");
    }

    #[test]
    fn enrich_record_preserves_existing_fields() {
        let record = json!({
            "document_id": 812,
            "storage_category": "insurance",
            "correspondent_name": "Wiener Linien GmbH & Co KG",
        });

        let enriched = planner().enrich_record(record);

        assert_eq!(enriched["document_id"], json!(812));
        assert_eq!(enriched["correspondent_name"], json!("Wiener Linien GmbH & Co KG"));
        assert_eq!(enriched["correspondent_canonical"], json!("Wiener Linien"));
        assert_eq!(
            enriched["storage_path_template"],
            json!("insurance/wiener-linien/{created_year}-{created_month}-{created_day}-{title}")
        );
        assert_eq!(enriched["storage_path_name"], json!("insurance - Wiener Linien"));
    }

    #[test]
    fn enrich_record_tolerates_missing_and_odd_fields() {
        let enriched = planner().enrich_record(json!({ "correspondent_name": 17 }));
        assert_eq!(enriched["correspondent_canonical"], json!("Unknown"));
        assert_eq!(
            enriched["storage_path_name"],
            json!("reference-documents - Unknown")
        );

        let enriched = planner().enrich_record(json!("not an object"));
        assert_eq!(
            enriched["storage_path_template"],
            json!("reference-documents/unknown/{created_year}-{created_month}-{created_day}-{title}")
        );
    }
}
