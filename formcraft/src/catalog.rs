//! Built-in templates and lookup of user-saved ones

use formcraft_fields::{FieldConfig, FieldType};
use formcraft_store::{FormStorage, TemplateRecord};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Identifiers of the built-in templates, in listing order.
pub const BUILT_IN_IDS: [&str; 3] = ["feedback", "registration", "survey"];

/// Title used for a template without a header field.
pub const FALLBACK_TEMPLATE_TITLE: &str = "Template Form";

/// Fields of a built-in template, or `None` if `id` is not built in.
pub fn built_in(id: &str) -> Option<Vec<FieldConfig>> {
    let fields = match id {
        "feedback" => vec![
            FieldConfig::new("1", FieldType::Header, "Feedback Form"),
            FieldConfig::new(
                "2",
                FieldType::Paragraph,
                "We value your feedback. Please answer the following:",
            ),
            FieldConfig::new("3", FieldType::Text, "Your Name").required(),
            FieldConfig::new("4", FieldType::Dropdown, "How was your experience?")
                .required()
                .with_option_labels(["Excellent", "Good", "Average", "Poor"]),
            FieldConfig::new("5", FieldType::MultipleChoice, "Would you recommend us?")
                .required()
                .with_option_labels(["Yes", "No"]),
        ],
        "registration" => vec![
            FieldConfig::new("1", FieldType::Header, "Registration Form"),
            FieldConfig::new("2", FieldType::Text, "Full Name").required(),
            FieldConfig::new("3", FieldType::Text, "Email Address").required(),
            FieldConfig::new("4", FieldType::Number, "Age"),
            FieldConfig::new("5", FieldType::Dropdown, "Select Course")
                .required()
                .with_option_labels(["Web Development", "Data Science", "AI/ML", "Cybersecurity"]),
        ],
        "survey" => vec![
            FieldConfig::new("1", FieldType::Header, "Survey Form"),
            FieldConfig::new(
                "2",
                FieldType::Paragraph,
                "Please help us improve by answering a few questions.",
            ),
            FieldConfig::new("3", FieldType::MultipleChoice, "How did you find us?")
                .required()
                .with_option_labels(["Google", "Friend", "Advertisement", "Other"]),
            FieldConfig::new("4", FieldType::Checkboxes, "Which features did you use?")
                .with_option_labels(["Form Builder", "Live Preview", "Templates", "Theme Switcher"]),
            FieldConfig::new("5", FieldType::Text, "Any additional comments?"),
        ],
        _ => return None,
    };
    Some(fields)
}

/// Title of a form built from `fields`: the first header's label.
pub fn title_for(fields: &[FieldConfig]) -> String {
    fields
        .iter()
        .find(|f| f.field_type() == FieldType::Header)
        .filter(|f| !f.label.is_empty())
        .map(|f| f.label.clone())
        .unwrap_or_else(|| FALLBACK_TEMPLATE_TITLE.to_string())
}

/// One row of a template listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub title: String,
    pub field_count: usize,
    pub built_in: bool,
}

/// Resolves template identifiers against the built-ins, then saved templates.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    storage: FormStorage,
}

impl TemplateCatalog {
    pub fn new(storage: FormStorage) -> Self {
        Self { storage }
    }

    /// Fields of template `id`. An unknown id yields an empty list.
    pub fn fields_for(&self, id: &str) -> Result<Vec<FieldConfig>> {
        Ok(self.lookup(id)?.map(|t| t.fields).unwrap_or_default())
    }

    /// The template named `id`, built-ins taking precedence over saved ones.
    pub fn lookup(&self, id: &str) -> Result<Option<TemplateRecord>> {
        if let Some(fields) = built_in(id) {
            return Ok(Some(TemplateRecord::new(id, title_for(&fields), fields)));
        }
        let found = self.storage.find_template(id)?;
        if found.is_none() {
            debug!(id, "template not found");
        }
        Ok(found)
    }

    pub fn is_built_in(id: &str) -> bool {
        BUILT_IN_IDS.contains(&id)
    }

    /// Built-ins followed by saved templates, newest first.
    pub fn list(&self) -> Result<Vec<TemplateSummary>> {
        let mut rows = Vec::new();
        for id in BUILT_IN_IDS {
            if let Some(fields) = built_in(id) {
                rows.push(TemplateSummary {
                    id: id.to_string(),
                    title: title_for(&fields),
                    field_count: fields.len(),
                    built_in: true,
                });
            }
        }
        rows.extend(self.storage.templates()?.into_iter().map(|t| TemplateSummary {
            field_count: t.fields.len(),
            id: t.id,
            title: t.title,
            built_in: false,
        }));
        Ok(rows)
    }
}
