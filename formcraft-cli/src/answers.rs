//! Turning `KEY=VALUE` arguments into response values.

use formcraft::fields::{set_checked, FieldConfig, FieldKind, FieldOption, ResponseValue};
use formcraft::FormSession;

use crate::error::{CliError, Result};

/// The field a key names: an exact id, then an exact label, then a label
/// ignoring case.
pub fn resolve_field<'a>(fields: &'a [FieldConfig], key: &str) -> Option<&'a FieldConfig> {
    fields
        .iter()
        .find(|f| f.id.as_str() == key)
        .or_else(|| fields.iter().find(|f| f.label == key))
        .or_else(|| fields.iter().find(|f| f.label.eq_ignore_ascii_case(key)))
}

/// Option value token for `raw`, matching a value or a label.
fn resolve_option(field: &FieldConfig, options: &[FieldOption], raw: &str) -> Result<String> {
    let raw = raw.trim();
    options
        .iter()
        .find(|o| o.value == raw)
        .or_else(|| options.iter().find(|o| o.label.eq_ignore_ascii_case(raw)))
        .or_else(|| options.iter().find(|o| o.value.eq_ignore_ascii_case(raw)))
        .map(|o| o.value.clone())
        .ok_or_else(|| {
            let choices: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            CliError::invalid(format!(
                "'{raw}' is not a choice of '{}' (choices: {})",
                field.result_key(),
                choices.join(", ")
            ))
        })
}

/// Parse the raw text given for `field`. Multi-select answers are comma separated.
pub fn parse_value(field: &FieldConfig, raw: &str) -> Result<ResponseValue> {
    match &field.kind {
        FieldKind::Header | FieldKind::Label | FieldKind::Paragraph | FieldKind::LineBreak => {
            Err(CliError::invalid(format!(
                "'{}' is a {} and takes no answer",
                field.result_key(),
                field.field_type()
            )))
        }
        FieldKind::Text | FieldKind::Number => Ok(ResponseValue::text(raw)),
        FieldKind::Dropdown { .. } if raw.trim().is_empty() => Ok(ResponseValue::text("")),
        FieldKind::Dropdown { options } | FieldKind::MultipleChoice { options } => {
            Ok(ResponseValue::Text(resolve_option(field, options, raw)?))
        }
        FieldKind::Checkboxes { options } | FieldKind::Tags { options } => {
            let mut value = ResponseValue::Selection(Vec::new());
            for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
                let token = resolve_option(field, options, part)?;
                value = set_checked(Some(&value), &token, true);
            }
            Ok(value)
        }
    }
}

/// Apply every `(key, raw)` pair to the session.
pub fn apply_answers(session: &mut FormSession, answers: &[(String, String)]) -> Result<()> {
    for (key, raw) in answers {
        let field = resolve_field(session.fields(), key)
            .ok_or_else(|| CliError::invalid(format!("no field named '{key}' in this form")))?;
        let id = field.id.clone();
        let value = parse_value(field, raw)?;
        session.set_response(id, value);
    }
    Ok(())
}
