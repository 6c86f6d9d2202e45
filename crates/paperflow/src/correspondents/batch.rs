use super::storage::StoragePathPlanner;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to access correspondent batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid correspondent CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(alias = "Name", alias = "correspondent_name")]
    name: String,
    #[serde(
        default,
        alias = "Category",
        alias = "storage_category",
        deserialize_with = "empty_string_as_none"
    )]
    category: Option<String>,
}

/// One resolved line of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRecord {
    pub raw: String,
    pub canonical: String,
    pub slug: String,
    pub path_template: String,
    pub display_name: String,
}

pub fn resolve_records<R: Read>(
    planner: &StoragePathPlanner,
    reader: R,
) -> Result<Vec<BatchRecord>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<BatchRow>() {
        let row = row?;
        let plan = planner.plan(row.category.as_deref(), &row.name);
        records.push(BatchRecord {
            raw: row.name,
            canonical: plan.correspondent_canonical,
            slug: plan.correspondent_slug,
            path_template: plan.path_template,
            display_name: plan.display_name,
        });
    }

    Ok(records)
}

/// Resolves every row of `reader` and writes the results as CSV, returning
/// the number of rows written.
pub fn resolve_csv<R: Read, W: Write>(
    planner: &StoragePathPlanner,
    reader: R,
    writer: W,
) -> Result<usize, BatchError> {
    let records = resolve_records(planner, reader)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in &records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;

    info!(rows = records.len(), "correspondent batch resolved");
    Ok(records.len())
}

pub fn resolve_path<P: AsRef<Path>, W: Write>(
    planner: &StoragePathPlanner,
    path: P,
    writer: W,
) -> Result<usize, BatchError> {
    let file = std::fs::File::open(path)?;
    resolve_csv(planner, file, writer)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
