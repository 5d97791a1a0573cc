//! Field model for Formcraft forms
//!
//! `formcraft-fields` is a pure, schema-only crate. It knows how a form field
//! is shaped, how an author edits one, and how a filler sees and answers one.
//! It does no I/O; persistence lives in `formcraft-store` and orchestration in
//! `formcraft`.
//!
//! # Architecture
//!
//! - **Closed variant set**: [`FieldType`] / [`FieldKind`] enumerate every
//!   field type. The editor and renderer match on them exhaustively.
//! - **Copy-on-write**: [`FieldEditor`] never mutates a field in place, it
//!   returns a replacement [`FieldConfig`].
//! - **Pure rendering**: [`render`] maps `(field, value, error)` to a display
//!   decision and [`apply`] maps a user interaction to the next value.

pub mod editor;
pub mod error;
pub mod render;
pub mod response;
pub mod types;

pub use editor::FieldEditor;
pub use error::{FieldsError, Result};
pub use render::{
    apply, render, Affordance, Choice, Interaction, Rendered, TextStyle, REQUIRED_MESSAGE,
    SELECT_PLACEHOLDER,
};
pub use response::{is_blank, set_checked, toggle, ErrorMap, ResponseMap, ResponseValue};
pub use types::{FieldConfig, FieldId, FieldKind, FieldOption, FieldType};
