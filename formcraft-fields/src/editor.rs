//! Copy-on-write editing of a single field.
//!
//! Every operation returns a replacement [`FieldConfig`]; the caller swaps it
//! into the owning form by id. No operation changes a field's id or type.

use tracing::debug;

use crate::types::{FieldConfig, FieldOption};

/// Placeholder label and value token for an option added by the author.
pub const NEW_OPTION: &str = "Option";

/// Editing operations over one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldEditor<'a> {
    field: &'a FieldConfig,
}

impl<'a> FieldEditor<'a> {
    pub fn new(field: &'a FieldConfig) -> Self {
        Self { field }
    }

    /// Replace the label. Empty labels are allowed.
    pub fn set_label(&self, label: impl Into<String>) -> FieldConfig {
        let mut next = self.field.clone();
        next.label = label.into();
        next
    }

    pub fn set_required(&self, required: bool) -> FieldConfig {
        let mut next = self.field.clone();
        next.required = required;
        next
    }

    pub fn toggle_required(&self) -> FieldConfig {
        self.set_required(!self.field.required)
    }

    pub fn set_short_form(&self, visible: bool) -> FieldConfig {
        let mut next = self.field.clone();
        next.display_on_short_form = visible;
        next
    }

    pub fn toggle_short_form(&self) -> FieldConfig {
        self.set_short_form(!self.field.display_on_short_form)
    }

    /// Set both the label and the value token of the option at `index` to
    /// `text`. Out-of-range indexes leave the field unchanged.
    pub fn set_option_label(&self, index: usize, text: impl Into<String>) -> FieldConfig {
        let mut next = self.field.clone();
        match next.kind.options_mut().and_then(|o| o.get_mut(index)) {
            Some(option) => {
                let text = text.into();
                *option = FieldOption::new(text.clone(), text);
            }
            None => debug!(field = %self.field.id, index, "option index out of range"),
        }
        next
    }

    /// Append a placeholder option. Types without options are unchanged.
    pub fn add_option(&self) -> FieldConfig {
        let mut next = self.field.clone();
        match next.kind.options_mut() {
            Some(options) => options.push(FieldOption::new(NEW_OPTION, NEW_OPTION)),
            None => debug!(field = %self.field.id, "field type has no options"),
        }
        next
    }

    /// Remove the option at `index`. Out-of-range indexes leave the field
    /// unchanged; removing the last option leaves an empty list.
    pub fn remove_option(&self, index: usize) -> FieldConfig {
        let mut next = self.field.clone();
        if let Some(options) = next.kind.options_mut() {
            if index < options.len() {
                options.remove(index);
            } else {
                debug!(field = %self.field.id, index, "option index out of range");
            }
        }
        next
    }
}

impl FieldConfig {
    /// Editing operations over this field.
    pub fn edit(&self) -> FieldEditor<'_> {
        FieldEditor::new(self)
    }
}
