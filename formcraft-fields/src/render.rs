//! Rendering dispatch for a single field.
//!
//! [`render`] decides what a filler sees for `(field, value, error)`, and
//! [`apply`] turns a filler's interaction into the field's next value. Both
//! are pure; neither computes the error flag.
//!
//! | type | affordance | value |
//! |---|---|---|
//! | header / label / paragraph | static text | none |
//! | linebreak | separator | none |
//! | text / number | free input | text |
//! | dropdown | select with an empty sentinel | text |
//! | checkboxes / tags | toggles | selection |
//! | multipleChoice | exclusive group | text |

use crate::response::{set_checked, toggle, ResponseValue};
use crate::types::{FieldConfig, FieldKind, FieldOption};

/// Inline message shown under an input whose required value is missing.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Label of the empty "nothing selected" entry of a dropdown.
pub const SELECT_PLACEHOLDER: &str = "Select...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Heading,
    Label,
    Paragraph,
}

/// One option as displayed, with its current selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// The input affordance chosen for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    StaticText { style: TextStyle, text: String },
    Separator,
    TextInput { value: String },
    NumberInput { value: String },
    /// Single select. `placeholder` is the empty-token entry.
    Select {
        placeholder: &'static str,
        choices: Vec<Choice>,
    },
    CheckboxGroup { choices: Vec<Choice> },
    /// Mutually exclusive choices; `group` is unique per field.
    RadioGroup { group: String, choices: Vec<Choice> },
    TagChips { choices: Vec<Choice> },
}

/// Display decision for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Caption shown above an input; `None` for static elements
    pub caption: Option<String>,
    pub affordance: Affordance,
    /// Whether the input is marked invalid
    pub invalid: bool,
    /// Inline error message, present iff `invalid`
    pub message: Option<&'static str>,
}

impl Rendered {
    fn passive(affordance: Affordance) -> Self {
        Self {
            caption: None,
            affordance,
            invalid: false,
            message: None,
        }
    }

    fn input(field: &FieldConfig, affordance: Affordance, error: bool) -> Self {
        Self {
            caption: Some(field.label.clone()),
            affordance,
            invalid: error,
            message: error.then_some(REQUIRED_MESSAGE),
        }
    }

    /// Whether the affordance produces change events.
    pub fn accepts_input(&self) -> bool {
        !matches!(
            self.affordance,
            Affordance::StaticText { .. } | Affordance::Separator
        )
    }
}

/// A filler's interaction with a rendered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Text typed into a free input
    Input(String),
    /// Token chosen in a single select or exclusive group
    Choose(String),
    /// Checkbox for `value` switched to `checked`
    SetChecked { value: String, checked: bool },
    /// Chip or checkbox for the token clicked
    Toggle(String),
}

fn static_text(field: &FieldConfig, style: TextStyle, value: Option<&ResponseValue>) -> Affordance {
    let text = match value.and_then(ResponseValue::as_text) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => field.label.clone(),
    };
    Affordance::StaticText { style, text }
}

fn text_of(value: Option<&ResponseValue>) -> String {
    value
        .and_then(ResponseValue::as_text)
        .unwrap_or_default()
        .to_string()
}

fn single_choices(options: &[FieldOption], value: Option<&ResponseValue>) -> Vec<Choice> {
    let current = value.and_then(ResponseValue::as_text);
    options
        .iter()
        .map(|o| Choice {
            label: o.label.clone(),
            value: o.value.clone(),
            selected: current == Some(o.value.as_str()),
        })
        .collect()
}

fn multi_choices(options: &[FieldOption], value: Option<&ResponseValue>) -> Vec<Choice> {
    options
        .iter()
        .map(|o| Choice {
            label: o.label.clone(),
            value: o.value.clone(),
            selected: value.is_some_and(|v| v.contains(&o.value)),
        })
        .collect()
}

/// Decide how `field` is displayed given its current value and error flag.
pub fn render(field: &FieldConfig, value: Option<&ResponseValue>, error: bool) -> Rendered {
    match &field.kind {
        FieldKind::Header => Rendered::passive(static_text(field, TextStyle::Heading, value)),
        FieldKind::Label => Rendered::passive(static_text(field, TextStyle::Label, value)),
        FieldKind::Paragraph => Rendered::passive(static_text(field, TextStyle::Paragraph, value)),
        FieldKind::LineBreak => Rendered::passive(Affordance::Separator),
        FieldKind::Text => Rendered::input(
            field,
            Affordance::TextInput {
                value: text_of(value),
            },
            error,
        ),
        FieldKind::Number => Rendered::input(
            field,
            Affordance::NumberInput {
                value: text_of(value),
            },
            error,
        ),
        FieldKind::Dropdown { options } => Rendered::input(
            field,
            Affordance::Select {
                placeholder: SELECT_PLACEHOLDER,
                choices: single_choices(options, value),
            },
            error,
        ),
        FieldKind::Checkboxes { options } => Rendered::input(
            field,
            Affordance::CheckboxGroup {
                choices: multi_choices(options, value),
            },
            error,
        ),
        FieldKind::MultipleChoice { options } => Rendered::input(
            field,
            Affordance::RadioGroup {
                group: format!("field-{}", field.id),
                choices: single_choices(options, value),
            },
            error,
        ),
        FieldKind::Tags { options } => Rendered::input(
            field,
            Affordance::TagChips {
                choices: multi_choices(options, value),
            },
            error,
        ),
    }
}

/// Next value of `field` after `interaction`, or `None` when the field does
/// not react to that interaction.
pub fn apply(
    field: &FieldConfig,
    current: Option<&ResponseValue>,
    interaction: Interaction,
) -> Option<ResponseValue> {
    match (&field.kind, interaction) {
        (FieldKind::Header | FieldKind::Label | FieldKind::Paragraph | FieldKind::LineBreak, _) => {
            None
        }
        (FieldKind::Text | FieldKind::Number, Interaction::Input(text)) => {
            Some(ResponseValue::Text(text))
        }
        (FieldKind::Dropdown { .. } | FieldKind::MultipleChoice { .. }, Interaction::Choose(token)) => {
            Some(ResponseValue::Text(token))
        }
        (
            FieldKind::Checkboxes { .. } | FieldKind::Tags { .. },
            Interaction::SetChecked { value, checked },
        ) => Some(set_checked(current, &value, checked)),
        (FieldKind::Checkboxes { .. } | FieldKind::Tags { .. }, Interaction::Toggle(token)) => {
            Some(toggle(current, &token))
        }
        _ => None,
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use crate::types::FieldType;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn checkbox_selection_never_has_duplicates(
            clicks in prop::collection::vec((0usize..4, any::<bool>()), 0..40)
        ) {
            let field = FieldConfig::new("c", FieldType::Checkboxes, "Pick")
                .with_option_labels(["A", "B", "C", "D"]);
            let tokens = ["a", "b", "c", "d"];
            let mut value = None;
            for (i, checked) in clicks {
                value = apply(
                    &field,
                    value.as_ref(),
                    Interaction::SetChecked { value: tokens[i].to_string(), checked },
                );
            }
            let selection = value.map(|v| v.selection().to_vec()).unwrap_or_default();
            let mut deduped = selection.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), selection.len());
        }

        #[test]
        fn double_toggle_restores_selection(start in prop::collection::btree_set("[a-d]", 0..4), token in "[a-d]") {
            let current = ResponseValue::Selection(start.into_iter().collect());
            let once = toggle(Some(&current), &token);
            let twice = toggle(Some(&once), &token);
            let mut expected: Vec<String> = current.selection().to_vec();
            expected.sort();
            let mut actual: Vec<String> = twice.selection().to_vec();
            actual.sort();
            prop_assert_eq!(actual, expected);
        }
    }
}
