//! Error types for form sessions

use formcraft_store::StoreError;
use thiserror::Error;

/// Result type alias for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors surfaced by form sessions and template handling.
///
/// Missing required answers are not errors; they are reported through the
/// session's error map.
#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot save an empty template.")]
    EmptyTemplate,

    #[error("Failed to save the template: {source}")]
    TemplateSave {
        #[source]
        source: StoreError,
    },

    #[error("No field with id '{id}' in this form")]
    FieldNotFound { id: String },
}
