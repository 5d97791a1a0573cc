//! `formcraft submissions` - browse the submission history.

use formcraft::store::SubmissionRecord;
use formcraft::view::FORM_NOT_FOUND;
use formcraft::{answer_rows, open_submission, Lookup};

use crate::context::Context;
use crate::error::{CliError, Result};
use crate::table::new_table;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn run_list(ctx: &Context, json: bool) -> Result<()> {
    let submissions = ctx.storage.submissions()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
        return Ok(());
    }
    if submissions.is_empty() {
        println!("No submissions yet");
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Submitted", "Answers"]);
    for record in &submissions {
        table.add_row(vec![
            record.id.clone(),
            record.title.clone(),
            record.timestamp.format(TIME_FORMAT).to_string(),
            record.responses.len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn find(ctx: &Context, id: &str) -> Result<SubmissionRecord> {
    match open_submission(&ctx.storage, id)? {
        Lookup::Found(record) => Ok(record),
        Lookup::NotFound => Err(CliError::NotFound(FORM_NOT_FOUND)),
    }
}

pub fn run_show(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let record = find(ctx, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", record.title);
    println!("Submission Time: {}", record.timestamp.format(TIME_FORMAT));
    let mut table = new_table();
    table.set_header(vec!["Question", "Answer"]);
    for row in answer_rows(&record) {
        table.add_row(vec![row.question, row.answer]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_delete(ctx: &Context, id: &str) -> Result<()> {
    if !ctx.storage.delete_submission(id)? {
        return Err(CliError::NotFound(FORM_NOT_FOUND));
    }
    println!("Deleted submission {id}");
    Ok(())
}

pub fn run_last(ctx: &Context) -> Result<()> {
    let latest = ctx.storage.latest_submission()?;
    if latest.is_empty() {
        println!("No submissions yet");
    } else {
        println!("{}", serde_json::to_string_pretty(&latest)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft::{FormStorage, FormcraftConfig};

    #[test]
    fn test_missing_submission_is_form_not_found() {
        let ctx = Context {
            config: FormcraftConfig::default(),
            storage: FormStorage::in_memory(),
        };
        assert_eq!(run_show(&ctx, "nope", false).unwrap_err().to_string(), "Form not found");
        assert_eq!(run_delete(&ctx, "nope").unwrap_err().to_string(), "Form not found");
        run_last(&ctx).unwrap();
        run_list(&ctx, true).unwrap();
    }
}
