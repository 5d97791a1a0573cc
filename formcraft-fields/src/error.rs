//! Error types for the field model

use thiserror::Error;

/// Result type for field model operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field model operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Field type name is not one of the known variants
    #[error("unknown field type: {name}")]
    UnknownFieldType { name: String },
}
