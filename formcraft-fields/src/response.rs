//! Response values and the per-form response and error maps.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::FieldId;

/// The current answer of one field.
///
/// Serializes as a bare JSON string or a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Free text, a number kept as text, or a single selected token
    Text(String),
    /// Selected tokens of a multi-select field, in selection order
    Selection(Vec<String>),
}

impl ResponseValue {
    pub fn text(s: impl Into<String>) -> Self {
        ResponseValue::Text(s.into())
    }

    /// Empty string or empty selection.
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseValue::Text(s) => s.is_empty(),
            ResponseValue::Selection(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(s) => Some(s),
            ResponseValue::Selection(_) => None,
        }
    }

    /// Selected tokens; a text value selects nothing.
    pub fn selection(&self) -> &[String] {
        match self {
            ResponseValue::Text(_) => &[],
            ResponseValue::Selection(v) => v,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.selection().iter().any(|t| t == token)
    }
}

impl std::fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseValue::Text(s) => f.write_str(s),
            ResponseValue::Selection(v) => f.write_str(&v.join(", ")),
        }
    }
}

/// A missing value, an empty string and an empty selection are all blank.
pub fn is_blank(value: Option<&ResponseValue>) -> bool {
    value.is_none_or(ResponseValue::is_empty)
}

/// Check or uncheck `token` in a multi-select value. Checking appends the
/// token if absent; unchecking removes it. Duplicates are never inserted.
pub fn set_checked(current: Option<&ResponseValue>, token: &str, checked: bool) -> ResponseValue {
    let mut selection: Vec<String> = current.map(|v| v.selection().to_vec()).unwrap_or_default();
    if checked {
        if !selection.iter().any(|t| t == token) {
            selection.push(token.to_string());
        }
    } else {
        selection.retain(|t| t != token);
    }
    ResponseValue::Selection(selection)
}

/// Flip membership of `token` in a multi-select value.
pub fn toggle(current: Option<&ResponseValue>, token: &str) -> ResponseValue {
    let selected = current.is_some_and(|v| v.contains(token));
    set_checked(current, token, !selected)
}

/// Current answers by field id. A field appears only after its first change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMap {
    values: HashMap<FieldId, ResponseValue>,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &FieldId) -> Option<&ResponseValue> {
        self.values.get(id)
    }

    pub fn set(&mut self, id: FieldId, value: ResponseValue) {
        self.values.insert(id, value);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// "Missing required value" flags by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    flags: BTreeMap<FieldId, bool>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&mut self, id: FieldId) {
        self.flags.insert(id, true);
    }

    /// Lower the flag of one field, keeping the others.
    pub fn clear(&mut self, id: &FieldId) {
        if let Some(flag) = self.flags.get_mut(id) {
            *flag = false;
        }
    }

    pub fn is_flagged(&self, id: &FieldId) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Ids whose flag is raised, in id order.
    pub fn flagged(&self) -> impl Iterator<Item = &FieldId> {
        self.flags
            .iter()
            .filter_map(|(id, flagged)| flagged.then_some(id))
    }

    pub fn has_errors(&self) -> bool {
        self.flags.values().any(|f| *f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_value_json_shapes() {
        assert_eq!(
            serde_json::to_string(&ResponseValue::text("hi")).unwrap(),
            "\"hi\""
        );
        assert_eq!(
            serde_json::to_string(&ResponseValue::Selection(vec!["a".into()])).unwrap(),
            "[\"a\"]"
        );
        let parsed: ResponseValue = serde_json::from_str("[\"x\",\"y\"]").unwrap();
        assert_eq!(parsed.selection(), ["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn blank_values() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&ResponseValue::text(""))));
        assert!(is_blank(Some(&ResponseValue::Selection(vec![]))));
        assert!(!is_blank(Some(&ResponseValue::text("0"))));
        assert!(!is_blank(Some(&ResponseValue::Selection(vec!["a".into()]))));
    }

    #[test]
    fn set_checked_never_duplicates() {
        let once = set_checked(None, "a", true);
        let twice = set_checked(Some(&once), "a", true);
        assert_eq!(twice.selection(), ["a".to_string()]);
    }

    #[test]
    fn set_checked_keeps_selection_order() {
        let v = set_checked(None, "b", true);
        let v = set_checked(Some(&v), "a", true);
        let v = set_checked(Some(&v), "c", true);
        assert_eq!(v.selection(), ["b", "a", "c"].map(String::from));
        let v = set_checked(Some(&v), "a", false);
        assert_eq!(v.selection(), ["b", "c"].map(String::from));
    }

    #[test]
    fn toggle_twice_returns_to_empty() {
        let v = toggle(None, "form_builder");
        assert!(v.contains("form_builder"));
        let v = toggle(Some(&v), "form_builder");
        assert!(v.is_empty());
    }

    #[test]
    fn error_map_clear_keeps_other_flags() {
        let mut errors = ErrorMap::new();
        errors.flag(FieldId::from("a"));
        errors.flag(FieldId::from("b"));
        errors.clear(&FieldId::from("a"));
        assert!(!errors.is_flagged(&FieldId::from("a")));
        assert!(errors.is_flagged(&FieldId::from("b")));
        assert!(errors.has_errors());
        assert_eq!(errors.flagged().count(), 1);
        errors.clear(&FieldId::from("b"));
        assert!(!errors.has_errors());
    }
}
