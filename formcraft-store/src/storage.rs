//! Typed access to the three persisted slots

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::kv::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::records::{LabeledResult, Record, SubmissionRecord, TemplateRecord};

/// Latest submitted result, overwritten on every submission.
pub const LATEST_SUBMISSION_KEY: &str = "submittedData";
/// All submissions, newest first.
pub const SUBMISSIONS_KEY: &str = "recentForms";
/// User-saved templates, newest first.
pub const TEMPLATES_KEY: &str = "templates";

/// Form persistence over a shared [`KeyValueStore`].
#[derive(Clone)]
pub struct FormStorage {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for FormStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStorage").finish_non_exhaustive()
    }
}

impl FormStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Storage backed by JSON files under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonFileStore::new(dir)))
    }

    /// Raw entries of a collection slot. A missing key reads as empty; content that
    /// is not a JSON array is [`StoreError::Corrupt`] so callers never write over it.
    fn load_raw(&self, key: &str) -> Result<Vec<Value>> {
        let Some(content) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(StoreError::Corrupt {
                key: key.to_string(),
                reason: format!("expected an array, found {}", value_kind(&other)),
            }),
            Err(e) => Err(StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn save_raw(&self, key: &str, items: &[Value]) -> Result<()> {
        let content = serde_json::to_string(items)?;
        self.store.set(key, &content)
    }

    /// Load every well-formed record in a collection, skipping malformed entries.
    /// An unreadable slot lists as empty; writes to it still fail.
    pub fn load_collection<T: Record>(&self, key: &str) -> Result<Vec<T>> {
        let items = match self.load_raw(key) {
            Ok(items) => items,
            Err(StoreError::Corrupt { key, reason }) => {
                warn!(key = %key, reason = %reason, "collection slot is unreadable, listing as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<T>(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(key, index, error = %e, "skipping malformed record");
                }
            }
        }
        Ok(records)
    }

    /// Put `record` at the front of a collection.
    ///
    /// Entries this build cannot parse are carried over untouched.
    pub fn prepend_and_save<T: Record>(&self, key: &str, record: &T) -> Result<()> {
        let mut items = self.load_raw(key)?;
        items.insert(0, serde_json::to_value(record)?);
        self.save_raw(key, &items)?;
        debug!(key, id = record.record_id(), total = items.len(), "prepended record");
        Ok(())
    }

    /// Drop every entry whose `id` equals `id`. Returns whether anything was removed.
    pub fn delete_from_collection(&self, key: &str, id: &str) -> Result<bool> {
        let items = self.load_raw(key)?;
        let before = items.len();
        let kept: Vec<Value> = items
            .into_iter()
            .filter(|item| item.get("id").and_then(Value::as_str) != Some(id))
            .collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.save_raw(key, &kept)?;
        debug!(key, id, removed = before - kept.len(), "deleted record");
        Ok(true)
    }

    /// Read a single-value slot. A missing or unreadable value is `None`.
    pub fn load_slot<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(content) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "slot is not readable, ignoring");
                Ok(None)
            }
        }
    }

    pub fn save_slot<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string(value)?;
        self.store.set(key, &content)
    }

    pub fn submissions(&self) -> Result<Vec<SubmissionRecord>> {
        self.load_collection(SUBMISSIONS_KEY)
    }

    pub fn find_submission(&self, id: &str) -> Result<Option<SubmissionRecord>> {
        Ok(self.submissions()?.into_iter().find(|s| s.id == id))
    }

    /// Store a submission: prepend to the list, then overwrite the latest-result slot.
    pub fn record_submission(&self, record: &SubmissionRecord) -> Result<()> {
        self.prepend_and_save(SUBMISSIONS_KEY, record)?;
        self.save_slot(LATEST_SUBMISSION_KEY, &record.responses)
    }

    pub fn delete_submission(&self, id: &str) -> Result<bool> {
        self.delete_from_collection(SUBMISSIONS_KEY, id)
    }

    /// The most recently submitted result, or an empty map if there is none.
    pub fn latest_submission(&self) -> Result<LabeledResult> {
        Ok(self
            .load_slot::<LabeledResult>(LATEST_SUBMISSION_KEY)?
            .unwrap_or_default())
    }

    pub fn templates(&self) -> Result<Vec<TemplateRecord>> {
        self.load_collection(TEMPLATES_KEY)
    }

    pub fn find_template(&self, id: &str) -> Result<Option<TemplateRecord>> {
        Ok(self.templates()?.into_iter().find(|t| t.id == id))
    }

    pub fn save_template(&self, record: &TemplateRecord) -> Result<()> {
        self.prepend_and_save(TEMPLATES_KEY, record)
    }

    pub fn delete_template(&self, id: &str) -> Result<bool> {
        self.delete_from_collection(TEMPLATES_KEY, id)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
