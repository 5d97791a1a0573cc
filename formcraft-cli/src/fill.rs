//! `formcraft fill` and `formcraft build`.

use formcraft::fields::{FieldId, REQUIRED_MESSAGE};
use formcraft::store::SubmissionRecord;
use formcraft::view::TEMPLATE_NOT_FOUND;
use formcraft::{answer_rows, FormSession, SubmitOutcome};

use crate::answers::apply_answers;
use crate::cli::FieldSpec;
use crate::context::Context;
use crate::error::{CliError, Result};
use crate::preview::print_preview;
use crate::prompts;
use crate::table::new_table;

pub struct FillOptions {
    pub answers: Vec<(String, String)>,
    pub short_form: bool,
    pub interactive: bool,
    pub json: bool,
}

pub fn run_fill(ctx: &Context, template: &str, options: FillOptions) -> Result<()> {
    let mut session = FormSession::from_template(ctx.storage.clone(), template)?
        .ok_or(CliError::NotFound(TEMPLATE_NOT_FOUND))?;
    session.set_short_form_only(options.short_form || ctx.config.short_form);
    apply_answers(&mut session, &options.answers)?;

    if options.interactive {
        prompts::answer_unanswered(&mut session)?;
    }
    submit(&mut session, options.interactive, options.json)
}

/// Submit, re-prompting flagged fields when interactive.
fn submit(session: &mut FormSession, interactive: bool, json: bool) -> Result<()> {
    loop {
        match session.submit()? {
            SubmitOutcome::Submitted(record) => return print_submitted(&record, json),
            SubmitOutcome::Rejected(errors) => {
                let flagged: Vec<FieldId> = errors.flagged().cloned().collect();
                for id in &flagged {
                    let name = session
                        .field(id)
                        .map(|f| f.result_key())
                        .unwrap_or_else(|| id.to_string());
                    eprintln!("{name}: {REQUIRED_MESSAGE}");
                }
                // A required field without choices can never be answered here.
                if !interactive || prompts::answer(session, &flagged)? == 0 {
                    return Err(CliError::Incomplete {
                        count: flagged.len(),
                    });
                }
            }
        }
    }
}

fn print_submitted(record: &SubmissionRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&record.responses)?);
        return Ok(());
    }
    println!("Submitted '{}' ({})", record.title, record.id);
    let mut table = new_table();
    table.set_header(vec!["Question", "Answer"]);
    for row in answer_rows(record) {
        table.add_row(vec![row.question, row.answer]);
    }
    println!("{table}");
    Ok(())
}

pub struct BuildOptions {
    pub title: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub answers: Vec<(String, String)>,
    pub save: bool,
    pub submit: bool,
}

/// A builder session holding one field per spec.
pub fn compose(ctx: &Context, title: Option<String>, specs: Vec<FieldSpec>) -> Result<FormSession> {
    let title = title.unwrap_or_else(|| ctx.config.default_title.clone());
    let mut session = FormSession::new(ctx.storage.clone(), title);
    for spec in specs {
        let id = session.add_field(spec.field_type);
        session.edit_field(&id, |e| {
            let mut field = e.set_required(spec.required);
            if let Some(label) = spec.label {
                field = field.edit().set_label(label);
            }
            if spec.options.is_empty() {
                field
            } else {
                field.with_option_labels(spec.options)
            }
        })?;
    }
    Ok(session)
}

pub fn run_build(ctx: &Context, options: BuildOptions) -> Result<()> {
    let mut session = compose(ctx, options.title, options.fields)?;
    apply_answers(&mut session, &options.answers)?;

    if options.save {
        let saved = session.save_as_template()?;
        println!("Saved template '{}' ({})", saved.title, saved.id);
    }
    if options.submit {
        return submit(&mut session, false, false);
    }
    if !options.save {
        print_preview(&session);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft::fields::{FieldConfig, FieldOption, FieldType};
    use formcraft::{FormStorage, FormcraftConfig};

    fn context() -> Context {
        Context {
            config: FormcraftConfig::default(),
            storage: FormStorage::in_memory(),
        }
    }

    #[test]
    fn test_compose_from_specs() {
        let ctx = context();
        let specs = vec![
            "header:Lunch Poll".parse::<FieldSpec>().unwrap(),
            "multipleChoice!:Main:Pizza,Salad".parse().unwrap(),
            "text".parse().unwrap(),
        ];
        let session = compose(&ctx, None, specs).unwrap();
        assert_eq!(session.title(), "My Custom Form");

        let fields = session.fields();
        assert_eq!(fields[0].label, "Lunch Poll");
        assert!(fields[1].required);
        assert_eq!(
            fields[1].options().unwrap(),
            &[FieldOption::new("Pizza", "pizza"), FieldOption::new("Salad", "salad")]
        );
        assert_eq!(fields[2].field_type(), FieldType::Text);
        assert_eq!(fields[2].label, "Text Field");
    }

    #[test]
    fn test_build_submit_persists() {
        let ctx = context();
        run_build(
            &ctx,
            BuildOptions {
                title: Some("Poll".into()),
                fields: vec!["dropdown!:Main:Pizza,Salad".parse().unwrap()],
                answers: vec![("Main".into(), "Salad".into())],
                save: false,
                submit: true,
            },
        )
        .unwrap();
        let submissions = ctx.storage.submissions().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].title, "Poll");
    }

    #[test]
    fn test_fill_missing_required_is_incomplete() {
        let ctx = context();
        let err = run_fill(
            &ctx,
            "feedback",
            FillOptions {
                answers: vec![("Your Name".into(), "Ada".into())],
                short_form: false,
                interactive: false,
                json: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Incomplete { count: 2 }));
        assert!(ctx.storage.submissions().unwrap().is_empty());
    }

    #[rstest::rstest]
    #[case::tags(FieldType::Tags)]
    #[case::checkboxes(FieldType::Checkboxes)]
    #[case::multiple_choice(FieldType::MultipleChoice)]
    fn test_interactive_submit_stops_without_choices(#[case] field_type: FieldType) {
        let fields = vec![FieldConfig::new("t", field_type, "Topics").required()];
        let mut session = FormSession::with_fields(FormStorage::in_memory(), "T", fields);

        let err = submit(&mut session, true, false).unwrap_err();
        assert!(matches!(err, CliError::Incomplete { count: 1 }));
        assert!(session.storage().submissions().unwrap().is_empty());
    }

    #[test]
    fn test_fill_unknown_template() {
        let ctx = context();
        let err = run_fill(
            &ctx,
            "nonexistent-id",
            FillOptions {
                answers: vec![],
                short_form: false,
                interactive: false,
                json: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Template not found");
    }
}
