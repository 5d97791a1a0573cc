//! Persisted record types

use chrono::{DateTime, Utc};
use formcraft_fields::{FieldConfig, ResponseValue};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Submitted answers keyed by field label, in form order.
///
/// A field that never received a value maps to `None` (JSON `null`).
pub type LabeledResult = IndexMap<String, Option<ResponseValue>>;

/// A record stored in an id-addressed collection.
pub trait Record: Serialize + DeserializeOwned {
    fn record_id(&self) -> &str;
}

fn new_record_id() -> String {
    Ulid::new().to_string()
}

/// Snapshot of one submitted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub title: String,
    #[serde(alias = "submittedAt")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "data")]
    pub responses: LabeledResult,
    /// Fields as they were at submission time
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl SubmissionRecord {
    /// A new record with a fresh id, stamped now.
    pub fn new(title: impl Into<String>, responses: LabeledResult, fields: Vec<FieldConfig>) -> Self {
        Self {
            id: new_record_id(),
            title: title.into(),
            timestamp: Utc::now(),
            responses,
            fields,
        }
    }
}

impl Record for SubmissionRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// A named, reusable field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl TemplateRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, fields: Vec<FieldConfig>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields,
        }
    }

    /// A new user template with a fresh id.
    pub fn fresh(title: impl Into<String>, fields: Vec<FieldConfig>) -> Self {
        Self::new(new_record_id(), title, fields)
    }
}

impl Record for TemplateRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}
