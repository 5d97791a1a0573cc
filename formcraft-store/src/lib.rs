//! Formcraft Store Crate
//!
//! Persistence for submitted forms and saved templates on top of an opaque
//! key-value string store, the way a browser's local storage is used.
//!
//! Three independent slots hold JSON values:
//!
//! ```text
//! submittedData   latest labeled result map (overwritten per submission)
//! recentForms     [SubmissionRecord], newest first
//! templates       [TemplateRecord], newest first
//! ```
//!
//! A missing key reads as an empty array or object. Collections are only
//! ever prepended to or filtered; stored records are never edited.

pub mod error;
pub mod kv;
pub mod records;
pub mod storage;

pub use error::{Result, StoreError};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use records::{LabeledResult, Record, SubmissionRecord, TemplateRecord};
pub use storage::{FormStorage, LATEST_SUBMISSION_KEY, SUBMISSIONS_KEY, TEMPLATES_KEY};
