//! Formcraft CLI library: argument definitions and command implementations
//! behind the `formcraft` binary.

pub mod answers;
pub mod cli;
pub mod context;
pub mod error;
pub mod fill;
pub mod preview;
pub mod prompts;
pub mod submissions;
pub mod table;
pub mod templates;

pub use cli::{Cli, Commands, FieldSpec, OptionEdit, SubmissionAction, TemplateAction};
pub use context::Context;
pub use error::{CliError, Result};
