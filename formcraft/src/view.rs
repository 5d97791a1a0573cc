//! Read-side views over stored submissions and templates

use formcraft_fields::{FieldConfig, ResponseValue};
use formcraft_store::{FormStorage, SubmissionRecord, TemplateRecord};

use crate::catalog::TemplateCatalog;
use crate::error::Result;

/// Shown when a template id does not resolve.
pub const TEMPLATE_NOT_FOUND: &str = "Template not found";
/// Shown when a submission id does not resolve.
pub const FORM_NOT_FOUND: &str = "Form not found";

const NO_ANSWER: &str = "(no answer)";

/// Outcome of resolving an opaque id handed over by navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

pub fn open_submission(storage: &FormStorage, id: &str) -> Result<Lookup<SubmissionRecord>> {
    Ok(storage.find_submission(id)?.into())
}

pub fn open_template(storage: &FormStorage, id: &str) -> Result<Lookup<TemplateRecord>> {
    Ok(TemplateCatalog::new(storage.clone()).lookup(id)?.into())
}

/// One question and its answer, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRow {
    pub question: String,
    pub answer: String,
}

/// Answers of `record` in stored order, with option tokens shown as labels.
///
/// Keys are matched against the recorded fields by label, then by id, since
/// older records keyed answers by field id.
pub fn answer_rows(record: &SubmissionRecord) -> Vec<AnswerRow> {
    record
        .responses
        .iter()
        .map(|(key, value)| {
            let field = record
                .fields
                .iter()
                .find(|f| &f.result_key() == key)
                .or_else(|| record.fields.iter().find(|f| f.id.as_str() == key));
            AnswerRow {
                question: field
                    .map(FieldConfig::result_key)
                    .unwrap_or_else(|| key.clone()),
                answer: display_answer(field, value.as_ref()),
            }
        })
        .collect()
}

/// Human-readable form of one answer.
pub fn display_answer(field: Option<&FieldConfig>, value: Option<&ResponseValue>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return NO_ANSWER.to_string();
    };
    let label_for = |token: &str| -> String {
        field
            .and_then(|f| f.options())
            .and_then(|opts| opts.iter().find(|o| o.value == token))
            .map(|o| o.label.clone())
            .unwrap_or_else(|| token.to_string())
    };
    match value {
        ResponseValue::Text(text) => label_for(text),
        ResponseValue::Selection(tokens) => tokens
            .iter()
            .map(|t| label_for(t))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
