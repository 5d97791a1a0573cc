//! `formcraft templates` - list, show, import, edit and delete templates.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use formcraft::fields::{FieldConfig, FieldId, FieldType};
use formcraft::store::TemplateRecord;
use formcraft::view::TEMPLATE_NOT_FOUND;
use formcraft::{open_template, FormSession, Lookup, TemplateCatalog};
use serde::Deserialize;
use tracing::debug;

use crate::cli::OptionEdit;
use crate::context::Context;
use crate::error::{CliError, Result};
use crate::preview::print_fields;
use crate::table::new_table;

pub fn run_list(ctx: &Context, json: bool) -> Result<()> {
    let rows = TemplateCatalog::new(ctx.storage.clone()).list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Fields", "Source"]);
    for row in &rows {
        table.add_row(vec![
            row.id.clone(),
            row.title.clone(),
            row.field_count.to_string(),
            if row.built_in { "built-in" } else { "saved" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn find(ctx: &Context, id: &str) -> Result<TemplateRecord> {
    match open_template(&ctx.storage, id)? {
        Lookup::Found(template) => Ok(template),
        Lookup::NotFound => Err(CliError::NotFound(TEMPLATE_NOT_FOUND)),
    }
}

pub fn run_show(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let template = find(ctx, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&template)?);
    } else {
        print_fields(&template.title, &template.fields);
    }
    Ok(())
}

/// Layout of a template file given to `templates import`.
#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fields: Vec<FieldConfig>,
}

fn check_unique_ids(fields: &[FieldConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.id.as_str()) {
            return Err(CliError::invalid(format!(
                "field id '{}' is used more than once",
                field.id
            )));
        }
    }
    Ok(())
}

pub fn run_import(ctx: &Context, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)?;
    let parsed: TemplateFile = serde_yaml::from_str(&content)?;
    check_unique_ids(&parsed.fields)?;
    debug!(file = %file.display(), fields = parsed.fields.len(), "importing template");

    let session = FormSession::with_fields(ctx.storage.clone(), parsed.title, parsed.fields);
    let saved = session.save_as_template()?;
    println!("Saved template '{}' ({})", saved.title, saved.id);
    Ok(())
}

/// Changes requested by `templates edit`, applied in field order below.
#[derive(Debug, Default)]
pub struct TemplateEdits {
    pub title: Option<String>,
    pub remove: Vec<String>,
    pub add: Vec<FieldType>,
    pub moves: Vec<(usize, usize)>,
    pub rename: Vec<(String, String)>,
    pub require: Vec<String>,
    pub short_form: Vec<String>,
    pub add_option: Vec<String>,
    pub option: Vec<OptionEdit>,
    pub remove_option: Vec<(String, usize)>,
}

/// Apply `edits` to the session's field list.
pub fn apply_edits(session: &mut FormSession, edits: TemplateEdits) -> Result<()> {
    for id in edits.remove {
        if !session.remove_field(&FieldId::from(id.as_str())) {
            return Err(CliError::invalid(format!("no field with id '{id}'")));
        }
    }
    for field_type in edits.add {
        session.add_field(field_type);
    }
    for (from, to) in edits.moves {
        if !session.move_field(from, to) {
            return Err(CliError::invalid(format!(
                "cannot move position {from}: the form has {} fields",
                session.fields().len()
            )));
        }
    }
    for (id, label) in edits.rename {
        session.edit_field(&FieldId::from(id), |e| e.set_label(label))?;
    }
    for id in edits.require {
        session.edit_field(&FieldId::from(id), |e| e.toggle_required())?;
    }
    for id in edits.short_form {
        session.edit_field(&FieldId::from(id), |e| e.toggle_short_form())?;
    }
    for id in edits.add_option {
        session.edit_field(&FieldId::from(id), |e| e.add_option())?;
    }
    for edit in edits.option {
        session.edit_field(&FieldId::from(edit.field), |e| {
            e.set_option_label(edit.index, edit.text)
        })?;
    }
    for (id, index) in edits.remove_option {
        session.edit_field(&FieldId::from(id), |e| e.remove_option(index))?;
    }
    if let Some(title) = edits.title {
        session.set_title(title);
    }
    Ok(())
}

/// Edit a template and store the result as a new one. The source is untouched.
pub fn run_edit(ctx: &Context, id: &str, edits: TemplateEdits) -> Result<()> {
    let template = find(ctx, id)?;
    let mut session = FormSession::with_fields(ctx.storage.clone(), template.title, template.fields);
    apply_edits(&mut session, edits)?;

    let saved = session.save_as_template()?;
    println!("Saved template '{}' ({})", saved.title, saved.id);
    print_fields(&saved.title, &saved.fields);
    Ok(())
}

pub fn run_delete(ctx: &Context, id: &str) -> Result<()> {
    if TemplateCatalog::is_built_in(id) {
        return Err(CliError::invalid(format!(
            "'{id}' is a built-in template and cannot be deleted"
        )));
    }
    if !ctx.storage.delete_template(id)? {
        return Err(CliError::NotFound(TEMPLATE_NOT_FOUND));
    }
    println!("Deleted template {id}");
    Ok(())
}
