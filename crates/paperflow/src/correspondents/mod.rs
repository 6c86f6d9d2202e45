//! Correspondent canonicalization for the document-automation pipeline.
//!
//! Raw sender names coming out of AI metadata extraction are mapped onto a
//! stable display name and path slug so repeated runs key the same
//! correspondent and storage path records.

pub mod batch;
pub mod extraction;
mod normalizer;
pub mod router;
pub mod rules;
mod service;
mod slug;
pub mod storage;

pub use batch::{resolve_csv, resolve_path, resolve_records, BatchError, BatchRecord};
pub use extraction::{
    AnalysisResult, CorrespondentCandidate, CorrespondentExtractor, CorrespondentSource,
    DocumentAnalysis, ExtractedCorrespondent, DEFAULT_MIN_CONFIDENCE,
};
pub use normalizer::{CorrespondentIdentity, NameNormalizer, UNKNOWN_CORRESPONDENT};
pub use router::correspondent_router;
pub use rules::{AliasEntry, AliasTable, LegalSuffixList, NormalizationRules, RulesError};
pub use service::{CorrespondentService, ExtractionOutcome};
pub use slug::{slugify, MAX_SLUG_LEN};
pub use storage::{StoragePathPlan, StoragePathPlanner, DEFAULT_STORAGE_CATEGORY};
