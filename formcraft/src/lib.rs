//! Formcraft
//!
//! Dynamic forms assembled from a closed palette of field types. This crate
//! ties the field model to persistence:
//!
//! - [`catalog`] resolves template ids against the built-in and saved templates
//! - [`session`] owns a form being built or filled and runs submit/validate/persist
//! - [`view`] looks up stored submissions and templates for display
//! - [`config`] loads layered settings
//!
//! ```
//! use formcraft::{FormSession, FormStorage, SubmitOutcome};
//! use formcraft::fields::{FieldId, Interaction};
//!
//! let storage = FormStorage::in_memory();
//! let mut session = FormSession::from_template(storage.clone(), "survey")?
//!     .expect("built-in template");
//! session.interact(&FieldId::from("3"), Interaction::Choose("friend".into()));
//! assert!(matches!(session.submit()?, SubmitOutcome::Submitted(_)));
//! assert_eq!(storage.submissions()?.len(), 1);
//! # Ok::<(), formcraft::FormError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod view;

pub use formcraft_fields as fields;
pub use formcraft_store as store;

pub use catalog::{TemplateCatalog, TemplateSummary, BUILT_IN_IDS};
pub use config::{load_config, ConfigError, ConfigProvider, FormcraftConfig};
pub use error::{FormError, Result};
pub use formcraft_store::FormStorage;
pub use session::{FormSession, SubmitOutcome, DEFAULT_FORM_TITLE, UNTITLED_TEMPLATE_TITLE};
pub use view::{answer_rows, open_submission, open_template, AnswerRow, Lookup};
