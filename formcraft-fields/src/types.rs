//! Core field types.
//!
//! A form is an ordered list of [`FieldConfig`]s. Each field carries a
//! [`FieldKind`], which is the field type plus, for option-bearing types,
//! the ordered option list. Keeping the options inside the variant makes
//! "options present iff the type is option-bearing" hold by construction.
//!
//! All types serialize to the JSON shape used by stored forms:
//!
//! ```json
//! {"id":"4","type":"dropdown","options":[{"label":"Good","value":"good"}],
//!  "label":"How was your experience?","required":true,"displayOnShortForm":false}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::FieldsError;

/// Stable identifier of a field, unique within one form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A selectable choice of an option-bearing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Text shown to the user
    pub label: String,
    /// Token stored in responses and used for comparison
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Build an option whose value token is a slug of the label:
    /// lowercased, with each whitespace run replaced by `_`.
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let value = slug(&label);
        Self { label, value }
    }
}

fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// The type of a field, without any per-field data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Header,
    Label,
    Paragraph,
    #[serde(rename = "linebreak")]
    LineBreak,
    Text,
    Number,
    Dropdown,
    Checkboxes,
    MultipleChoice,
    Tags,
}

impl FieldType {
    /// Every field type, in palette order.
    pub const ALL: [FieldType; 10] = [
        FieldType::Header,
        FieldType::Label,
        FieldType::Paragraph,
        FieldType::LineBreak,
        FieldType::Dropdown,
        FieldType::Tags,
        FieldType::Checkboxes,
        FieldType::MultipleChoice,
        FieldType::Text,
        FieldType::Number,
    ];

    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Header => "header",
            FieldType::Label => "label",
            FieldType::Paragraph => "paragraph",
            FieldType::LineBreak => "linebreak",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Dropdown => "dropdown",
            FieldType::Checkboxes => "checkboxes",
            FieldType::MultipleChoice => "multipleChoice",
            FieldType::Tags => "tags",
        }
    }

    /// Whether fields of this type carry an option list.
    pub fn is_option_bearing(self) -> bool {
        matches!(
            self,
            FieldType::Dropdown | FieldType::Checkboxes | FieldType::MultipleChoice | FieldType::Tags
        )
    }

    /// Whether fields of this type collect a value from the filler.
    pub fn accepts_input(self) -> bool {
        match self {
            FieldType::Header | FieldType::Label | FieldType::Paragraph | FieldType::LineBreak => {
                false
            }
            FieldType::Text
            | FieldType::Number
            | FieldType::Dropdown
            | FieldType::Checkboxes
            | FieldType::MultipleChoice
            | FieldType::Tags => true,
        }
    }

    /// Whether responses for this type are a list of tokens.
    pub fn is_multi_select(self) -> bool {
        matches!(self, FieldType::Checkboxes | FieldType::Tags)
    }

    /// Label given to a freshly added field, e.g. `"Dropdown Field"`.
    pub fn default_label(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} Field", first.to_uppercase(), chars.as_str()),
            None => "Field".to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldsError;

    /// Parse a wire name, ignoring case (`multiplechoice` is accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldsError::UnknownFieldType {
                name: s.to_string(),
            })
    }
}

/// Field type together with the data only some types carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Header,
    Label,
    Paragraph,
    #[serde(rename = "linebreak")]
    LineBreak,
    Text,
    Number,
    Dropdown {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Checkboxes {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    MultipleChoice {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Tags {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
}

impl FieldKind {
    /// Build a kind for `field_type`. `options` is dropped for types that
    /// do not carry options.
    pub fn new(field_type: FieldType, options: Vec<FieldOption>) -> Self {
        match field_type {
            FieldType::Header => FieldKind::Header,
            FieldType::Label => FieldKind::Label,
            FieldType::Paragraph => FieldKind::Paragraph,
            FieldType::LineBreak => FieldKind::LineBreak,
            FieldType::Text => FieldKind::Text,
            FieldType::Number => FieldKind::Number,
            FieldType::Dropdown => FieldKind::Dropdown { options },
            FieldType::Checkboxes => FieldKind::Checkboxes { options },
            FieldType::MultipleChoice => FieldKind::MultipleChoice { options },
            FieldType::Tags => FieldKind::Tags { options },
        }
    }

    /// Kind for a newly added field: option-bearing types start with
    /// `Option 1` / `Option 2`.
    pub fn with_default_options(field_type: FieldType) -> Self {
        Self::new(
            field_type,
            vec![
                FieldOption::new("Option 1", "option_1"),
                FieldOption::new("Option 2", "option_2"),
            ],
        )
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Header => FieldType::Header,
            FieldKind::Label => FieldType::Label,
            FieldKind::Paragraph => FieldType::Paragraph,
            FieldKind::LineBreak => FieldType::LineBreak,
            FieldKind::Text => FieldType::Text,
            FieldKind::Number => FieldType::Number,
            FieldKind::Dropdown { .. } => FieldType::Dropdown,
            FieldKind::Checkboxes { .. } => FieldType::Checkboxes,
            FieldKind::MultipleChoice { .. } => FieldType::MultipleChoice,
            FieldKind::Tags { .. } => FieldType::Tags,
        }
    }

    /// The option list, or `None` for types without options.
    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            FieldKind::Dropdown { options }
            | FieldKind::Checkboxes { options }
            | FieldKind::MultipleChoice { options }
            | FieldKind::Tags { options } => Some(options),
            FieldKind::Header
            | FieldKind::Label
            | FieldKind::Paragraph
            | FieldKind::LineBreak
            | FieldKind::Text
            | FieldKind::Number => None,
        }
    }

    pub(crate) fn options_mut(&mut self) -> Option<&mut Vec<FieldOption>> {
        match self {
            FieldKind::Dropdown { options }
            | FieldKind::Checkboxes { options }
            | FieldKind::MultipleChoice { options }
            | FieldKind::Tags { options } => Some(options),
            FieldKind::Header
            | FieldKind::Label
            | FieldKind::Paragraph
            | FieldKind::LineBreak
            | FieldKind::Text
            | FieldKind::Number => None,
        }
    }
}

/// One question or element of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub id: FieldId,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub display_on_short_form: bool,
}

impl FieldConfig {
    /// A field with no options, not required and hidden from the short form.
    pub fn new(id: impl Into<FieldId>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FieldKind::new(field_type, Vec::new()),
            label: label.into(),
            required: false,
            display_on_short_form: false,
        }
    }

    /// A freshly added field of `field_type`: generated id, default label,
    /// default options for option-bearing types.
    pub fn for_type(field_type: FieldType) -> Self {
        Self {
            id: FieldId::generate(),
            kind: FieldKind::with_default_options(field_type),
            label: field_type.default_label(),
            required: false,
            display_on_short_form: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn on_short_form(mut self) -> Self {
        self.display_on_short_form = true;
        self
    }

    /// Replace the options with one slugged option per label. No effect on
    /// types without options.
    pub fn with_option_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(options) = self.kind.options_mut() {
            *options = labels.into_iter().map(FieldOption::from_label).collect();
        }
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn options(&self) -> Option<&[FieldOption]> {
        self.kind.options()
    }

    /// Key used for this field in a labeled result map.
    pub fn result_key(&self) -> String {
        if self.label.is_empty() {
            format!("Field {}", self.id)
        } else {
            self.label.clone()
        }
    }
}
