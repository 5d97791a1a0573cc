//! Form sessions: the builder and template-fill screens' state
//!
//! A [`FormSession`] owns an ordered field list together with the answers
//! being collected for it. Fields are replaced wholesale by id; the
//! [`FieldEditor`] produces the replacements.

use formcraft_fields::{
    apply, is_blank, render, ErrorMap, FieldConfig, FieldEditor, FieldId, FieldType, Interaction,
    Rendered, ResponseMap, ResponseValue,
};
use formcraft_store::{FormStorage, LabeledResult, SubmissionRecord, TemplateRecord};
use tracing::{debug, info, warn};

use crate::catalog::{title_for, TemplateCatalog};
use crate::error::{FormError, Result};

/// Title of a new builder form.
pub const DEFAULT_FORM_TITLE: &str = "My Custom Form";

/// Title given to a template saved with a blank title.
pub const UNTITLED_TEMPLATE_TITLE: &str = "Untitled Template";

/// Result of [`FormSession::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Required fields were empty. Nothing was persisted.
    Rejected(ErrorMap),
    Submitted(SubmissionRecord),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

#[derive(Debug, Clone)]
pub struct FormSession {
    title: String,
    fields: Vec<FieldConfig>,
    responses: ResponseMap,
    errors: ErrorMap,
    short_form_only: bool,
    last_submitted: Option<LabeledResult>,
    storage: FormStorage,
}

impl FormSession {
    /// An empty builder session.
    pub fn new(storage: FormStorage, title: impl Into<String>) -> Self {
        Self::with_fields(storage, title, Vec::new())
    }

    pub fn with_fields(
        storage: FormStorage,
        title: impl Into<String>,
        fields: Vec<FieldConfig>,
    ) -> Self {
        Self {
            title: title.into(),
            fields,
            responses: ResponseMap::new(),
            errors: ErrorMap::new(),
            short_form_only: false,
            last_submitted: None,
            storage,
        }
    }

    /// A fill session seeded from template `id`, titled after its first header.
    ///
    /// Returns `None` when no built-in or saved template has that id.
    pub fn from_template(storage: FormStorage, id: &str) -> Result<Option<Self>> {
        let Some(template) = TemplateCatalog::new(storage.clone()).lookup(id)? else {
            return Ok(None);
        };
        let title = title_for(&template.fields);
        debug!(id, title = %title, fields = template.fields.len(), "opened template session");
        Ok(Some(Self::with_fields(storage, title, template.fields)))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn short_form_only(&self) -> bool {
        self.short_form_only
    }

    pub fn set_short_form_only(&mut self, enabled: bool) {
        self.short_form_only = enabled;
    }

    /// The labeled result of the last successful submit in this session.
    pub fn last_submitted(&self) -> Option<&LabeledResult> {
        self.last_submitted.as_ref()
    }

    pub fn storage(&self) -> &FormStorage {
        &self.storage
    }

    fn is_included(&self, field: &FieldConfig) -> bool {
        !self.short_form_only || field.display_on_short_form
    }

    /// Fields shown under the current short-form mode, in order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.iter().filter(|f| self.is_included(f))
    }

    /// Append a fresh field of `field_type` and return its id.
    pub fn add_field(&mut self, field_type: FieldType) -> FieldId {
        let field = FieldConfig::for_type(field_type);
        let id = field.id.clone();
        debug!(id = %id, field_type = %field_type, "added field");
        self.fields.push(field);
        id
    }

    /// Replace the field whose id matches `updated.id`. Returns whether one matched.
    pub fn update_field(&mut self, updated: FieldConfig) -> bool {
        match self.fields.iter_mut().find(|f| f.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => {
                debug!(id = %updated.id, "update for unknown field ignored");
                false
            }
        }
    }

    /// Apply one editor operation to field `id` and store the result.
    pub fn edit_field<F>(&mut self, id: &FieldId, edit: F) -> Result<()>
    where
        F: FnOnce(FieldEditor<'_>) -> FieldConfig,
    {
        let field = self.field(id).ok_or_else(|| FormError::FieldNotFound {
            id: id.to_string(),
        })?;
        let updated = edit(field.edit());
        self.update_field(updated);
        Ok(())
    }

    /// Drop field `id`. Its response and error entries are left behind.
    pub fn remove_field(&mut self, id: &FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| &f.id != id);
        self.fields.len() != before
    }

    /// Move the field at `from` so it ends up at `to`.
    ///
    /// An out-of-range `from` is a no-op; `to` is clamped to the end.
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() {
            return false;
        }
        let field = self.fields.remove(from);
        let to = to.min(self.fields.len());
        self.fields.insert(to, field);
        true
    }

    /// Record an answer for field `id` and clear its error flag.
    pub fn set_response(&mut self, id: FieldId, value: ResponseValue) {
        self.errors.clear(&id);
        self.responses.set(id, value);
    }

    /// Route a filler interaction through the renderer's change rules.
    ///
    /// Returns the new value, or `None` if the field is unknown or ignores it.
    pub fn interact(&mut self, id: &FieldId, interaction: Interaction) -> Option<ResponseValue> {
        let field = self.field(id)?;
        let next = apply(field, self.responses.get(id), interaction)?;
        self.set_response(id.clone(), next.clone());
        Some(next)
    }

    pub fn render_field(&self, field: &FieldConfig) -> Rendered {
        render(
            field,
            self.responses.get(&field.id),
            self.errors.is_flagged(&field.id),
        )
    }

    /// Validate, then persist the included answers.
    ///
    /// Missing required answers flag those fields and persist nothing.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let mut errors = ErrorMap::new();
        let mut result = LabeledResult::new();

        for field in self.fields.iter().filter(|f| self.is_included(f)) {
            let value = self.responses.get(&field.id);
            if field.required && is_blank(value) {
                errors.flag(field.id.clone());
            }
            result.insert(field.result_key(), value.cloned());
        }

        self.errors = errors;
        if self.errors.has_errors() {
            let missing: Vec<_> = self.errors.flagged().map(|id| id.to_string()).collect();
            warn!(title = %self.title, ?missing, "submission rejected");
            return Ok(SubmitOutcome::Rejected(self.errors.clone()));
        }

        let record = SubmissionRecord::new(self.title.clone(), result, self.fields.clone());
        self.storage.record_submission(&record)?;
        info!(id = %record.id, title = %record.title, answers = record.responses.len(), "form submitted");

        self.last_submitted = Some(record.responses.clone());
        Ok(SubmitOutcome::Submitted(record))
    }

    /// Save the current fields as a new user template.
    ///
    /// A blank title becomes "Untitled Template". Storage failures come back
    /// as [`FormError::TemplateSave`].
    pub fn save_as_template(&self) -> Result<TemplateRecord> {
        if self.fields.is_empty() {
            warn!(title = %self.title, "refusing to save empty template");
            return Err(FormError::EmptyTemplate);
        }

        let title = match self.title.trim() {
            "" => UNTITLED_TEMPLATE_TITLE,
            trimmed => trimmed,
        };
        let record = TemplateRecord::fresh(title, self.fields.clone());
        self.storage
            .save_template(&record)
            .map_err(|source| FormError::TemplateSave { source })?;

        info!(id = %record.id, title = %record.title, fields = record.fields.len(), "template saved");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_fields::FieldOption;
    use formcraft_store::{KeyValueStore, MemoryStore, StoreError};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::sync::Arc;

    fn builder() -> FormSession {
        FormSession::new(FormStorage::in_memory(), DEFAULT_FORM_TITLE)
    }

    fn labels(session: &FormSession) -> Vec<String> {
        session.fields().iter().map(|f| f.label.clone()).collect()
    }

    fn abcd() -> FormSession {
        let fields = ["A", "B", "C", "D"]
            .iter()
            .map(|l| FieldConfig::new(*l, FieldType::Text, *l))
            .collect();
        FormSession::with_fields(FormStorage::in_memory(), "T", fields)
    }

    #[rstest]
    #[case::dropdown(FieldType::Dropdown)]
    #[case::checkboxes(FieldType::Checkboxes)]
    #[case::multiple_choice(FieldType::MultipleChoice)]
    #[case::tags(FieldType::Tags)]
    fn test_add_option_bearing_field(#[case] field_type: FieldType) {
        let mut session = builder();
        let id = session.add_field(field_type);
        let field = session.field(&id).unwrap();
        assert_eq!(
            field.options().unwrap(),
            &[
                FieldOption::new("Option 1", "option_1"),
                FieldOption::new("Option 2", "option_2")
            ]
        );
        assert!(!field.required);
        assert!(!field.display_on_short_form);
    }

    #[rstest]
    #[case::header(FieldType::Header)]
    #[case::label(FieldType::Label)]
    #[case::paragraph(FieldType::Paragraph)]
    #[case::linebreak(FieldType::LineBreak)]
    #[case::text(FieldType::Text)]
    #[case::number(FieldType::Number)]
    fn test_add_plain_field_has_no_options(#[case] field_type: FieldType) {
        let mut session = builder();
        let id = session.add_field(field_type);
        assert!(session.field(&id).unwrap().options().is_none());
    }

    #[test]
    fn test_add_field_ids_are_unique() {
        let mut session = builder();
        let a = session.add_field(FieldType::Text);
        let b = session.add_field(FieldType::Text);
        assert_ne!(a, b);
        assert_eq!(labels(&session), vec!["Text Field", "Text Field"]);
    }

    #[test]
    fn test_update_unknown_field_is_noop() {
        let mut session = abcd();
        let before = session.fields().to_vec();
        assert!(!session.update_field(FieldConfig::new("Z", FieldType::Text, "Z")));
        assert_eq!(session.fields(), before.as_slice());
    }

    #[test]
    fn test_edit_field_replaces_by_id() {
        let mut session = abcd();
        session
            .edit_field(&FieldId::from("B"), |e| e.set_label("Renamed"))
            .unwrap();
        assert_eq!(labels(&session), vec!["A", "Renamed", "C", "D"]);

        let err = session
            .edit_field(&FieldId::from("Z"), |e| e.set_required(true))
            .unwrap_err();
        assert!(matches!(err, FormError::FieldNotFound { .. }));
    }

    #[test]
    fn test_remove_field_leaves_stale_response() {
        let mut session = abcd();
        session.set_response(FieldId::from("A"), ResponseValue::text("x"));
        assert!(session.remove_field(&FieldId::from("A")));
        assert!(!session.remove_field(&FieldId::from("A")));
        assert_eq!(session.fields().len(), 3);
        assert_eq!(session.responses().len(), 1);
    }

    #[test]
    fn test_move_first_to_third() {
        let mut session = abcd();
        assert!(session.move_field(0, 2));
        assert_eq!(labels(&session), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_move_out_of_range() {
        let mut session = abcd();
        assert!(!session.move_field(4, 0));
        assert!(session.move_field(0, 99));
        assert_eq!(labels(&session), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_required_empty_field_blocks_submit() {
        let storage = FormStorage::in_memory();
        let fields = vec![
            FieldConfig::new("name", FieldType::Text, "Name").required(),
            FieldConfig::new("tags", FieldType::Tags, "Tags")
                .required()
                .with_option_labels(["a"]),
            FieldConfig::new("note", FieldType::Text, "Note"),
        ];
        let mut session = FormSession::with_fields(storage.clone(), "T", fields);
        session.set_response(FieldId::from("name"), ResponseValue::text(""));
        session.set_response(FieldId::from("tags"), ResponseValue::Selection(vec![]));

        let outcome = session.submit().unwrap();
        let SubmitOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        let flagged: Vec<_> = errors.flagged().map(|id| id.as_str().to_string()).collect();
        assert_eq!(flagged, vec!["name", "tags"]);
        assert!(storage.submissions().unwrap().is_empty());
        assert!(storage.latest_submission().unwrap().is_empty());
        assert!(session.last_submitted().is_none());
    }

    #[test]
    fn test_change_clears_error_flag() {
        let fields = vec![FieldConfig::new("name", FieldType::Text, "Name").required()];
        let mut session = FormSession::with_fields(FormStorage::in_memory(), "T", fields);
        assert!(!session.submit().unwrap().is_submitted());
        let id = FieldId::from("name");
        assert!(session.errors().is_flagged(&id));
        assert!(session.render_field(&session.fields()[0].clone()).invalid);

        session.interact(&id, Interaction::Input("A".into()));
        assert!(!session.errors().is_flagged(&id));
        assert!(session.submit().unwrap().is_submitted());
    }

    #[test]
    fn test_short_form_filters_validation_and_result() {
        let fields = vec![
            FieldConfig::new("a", FieldType::Text, "Shown").on_short_form(),
            FieldConfig::new("b", FieldType::Text, "Hidden").required(),
        ];
        let mut session = FormSession::with_fields(FormStorage::in_memory(), "T", fields);
        session.set_short_form_only(true);
        assert_eq!(session.visible_fields().count(), 1);

        let SubmitOutcome::Submitted(record) = session.submit().unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(record.responses.keys().collect::<Vec<_>>(), vec!["Shown"]);
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn test_blank_label_uses_synthesized_key() {
        let fields = vec![FieldConfig::new("7", FieldType::Text, "")];
        let mut session = FormSession::with_fields(FormStorage::in_memory(), "T", fields);
        session.set_response(FieldId::from("7"), ResponseValue::text("x"));
        let SubmitOutcome::Submitted(record) = session.submit().unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(record.responses["Field 7"], Some(ResponseValue::text("x")));
    }

    #[test]
    fn test_feedback_scenario() {
        let storage = FormStorage::in_memory();
        let mut session = FormSession::from_template(storage.clone(), "feedback")
            .unwrap()
            .unwrap();
        assert_eq!(session.title(), "Feedback Form");

        let fields = session.fields();
        assert_eq!(fields[0].field_type(), FieldType::Header);
        assert_eq!(fields[0].label, "Feedback Form");
        assert_eq!(fields[2].field_type(), FieldType::Text);
        assert_eq!(fields[2].label, "Your Name");
        assert!(fields[2].required);
        assert_eq!(fields[3].field_type(), FieldType::Dropdown);
        assert_eq!(fields[3].label, "How was your experience?");
        assert!(fields[3].required);
        let option_labels: Vec<_> = fields[3]
            .options()
            .unwrap()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(option_labels, vec!["Excellent", "Good", "Average", "Poor"]);

        session.interact(&FieldId::from("3"), Interaction::Input("Ada".into()));
        session.interact(&FieldId::from("4"), Interaction::Choose("good".into()));
        let SubmitOutcome::Rejected(errors) = session.submit().unwrap() else {
            panic!("recommendation is required");
        };
        assert!(errors.is_flagged(&FieldId::from("5")));

        session.interact(&FieldId::from("5"), Interaction::Choose("yes".into()));
        let outcome = session.submit().unwrap();
        assert!(outcome.is_submitted());
        assert_eq!(storage.submissions().unwrap().len(), 1);
        assert_eq!(
            storage.latest_submission().unwrap()["Your Name"],
            Some(ResponseValue::text("Ada"))
        );
    }

    #[test]
    fn test_survey_untouched_checkboxes_persist_as_none() {
        let storage = FormStorage::in_memory();
        let mut session = FormSession::from_template(storage.clone(), "survey")
            .unwrap()
            .unwrap();
        session.interact(&FieldId::from("3"), Interaction::Choose("google".into()));

        let SubmitOutcome::Submitted(record) = session.submit().unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(record.responses["Which features did you use?"], None);

        let stored = storage.find_submission(&record.id).unwrap().unwrap();
        assert_eq!(stored.responses, record.responses);
        assert_eq!(session.last_submitted(), Some(&record.responses));
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let session = FormSession::from_template(FormStorage::in_memory(), "nonexistent-id").unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_save_empty_template_is_rejected() {
        let storage = FormStorage::in_memory();
        let session = FormSession::new(storage.clone(), "Empty");
        assert!(matches!(
            session.save_as_template(),
            Err(FormError::EmptyTemplate)
        ));
        assert!(storage.templates().unwrap().is_empty());
    }

    #[rstest]
    #[case::kept("  Poll  ", "Poll")]
    #[case::blank("   ", "Untitled Template")]
    fn test_save_as_template_title(#[case] title: &str, #[case] expected: &str) {
        let storage = FormStorage::in_memory();
        let mut session = FormSession::new(storage.clone(), title);
        session.add_field(FieldType::Text);
        let saved = session.save_as_template().unwrap();
        assert_eq!(saved.title, expected);
        assert_eq!(storage.templates().unwrap()[0].id, saved.id);
    }

    #[test]
    fn test_save_as_template_always_new_id() {
        let storage = FormStorage::in_memory();
        let mut session = FormSession::from_template(storage.clone(), "registration")
            .unwrap()
            .unwrap();
        session.add_field(FieldType::Tags);
        let first = session.save_as_template().unwrap();
        let second = session.save_as_template().unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(storage.templates().unwrap().len(), 2);
        assert_eq!(first.fields.len(), 6);
    }

    struct FailingStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> formcraft_store::Result<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> formcraft_store::Result<()> {
            Err(StoreError::backend("quota exceeded"))
        }
        fn remove(&self, key: &str) -> formcraft_store::Result<()> {
            self.inner.remove(key)
        }
    }

    fn failing_storage() -> FormStorage {
        FormStorage::new(Arc::new(FailingStore {
            inner: MemoryStore::new(),
        }))
    }

    #[test]
    fn test_template_save_failure_is_caught() {
        let mut session = FormSession::new(failing_storage(), "T");
        session.add_field(FieldType::Text);
        let err = session.save_as_template().unwrap_err();
        assert!(matches!(err, FormError::TemplateSave { .. }));
    }

    #[test]
    fn test_submit_failure_propagates() {
        let mut session = FormSession::new(failing_storage(), "T");
        session.add_field(FieldType::Text);
        let err = session.submit().unwrap_err();
        assert!(matches!(err, FormError::Store(_)));
        assert!(session.last_submitted().is_none());
    }

    #[test]
    fn test_submit_keeps_unreadable_history() {
        let store = Arc::new(MemoryStore::new());
        let history = r#"[{"id":"old1","title":"F","timestamp":"2024-01-01T00:00:00Z","responses":{}},]"#;
        store.set(formcraft_store::SUBMISSIONS_KEY, history).unwrap();
        let mut session = FormSession::new(FormStorage::new(store.clone()), "T");
        session.add_field(FieldType::Text);

        let err = session.submit().unwrap_err();
        assert!(matches!(err, FormError::Store(StoreError::Corrupt { .. })));
        assert!(session.last_submitted().is_none());
        assert_eq!(
            store.get(formcraft_store::SUBMISSIONS_KEY).unwrap().as_deref(),
            Some(history)
        );
    }

    proptest! {
        #[test]
        fn prop_move_preserves_other_order(len in 1usize..12, from in 0usize..12, to in 0usize..12) {
            let from = from % len;
            let to = to % len;
            let fields: Vec<_> = (0..len)
                .map(|i| FieldConfig::new(i.to_string(), FieldType::Text, i.to_string()))
                .collect();
            let mut session = FormSession::with_fields(FormStorage::in_memory(), "T", fields.clone());
            session.move_field(from, to);

            let moved = &fields[from];
            prop_assert_eq!(&session.fields()[to], moved);
            let rest: Vec<_> = session.fields().iter().filter(|f| f.id != moved.id).collect();
            let expected: Vec<_> = fields.iter().filter(|f| f.id != moved.id).collect();
            prop_assert_eq!(rest, expected);
        }

        #[test]
        fn prop_filled_required_fields_are_never_flagged(answer in "[a-z]{1,8}") {
            let fields = vec![FieldConfig::new("q", FieldType::Text, "Q").required()];
            let mut session = FormSession::with_fields(FormStorage::in_memory(), "T", fields);
            session.set_response(FieldId::from("q"), ResponseValue::text(answer));
            prop_assert!(session.submit().unwrap().is_submitted());
            prop_assert!(!session.errors().has_errors());
        }
    }
}
