//! Formcraft CLI - build, fill and store dynamic forms.
//!
//! Commands:
//! - `formcraft templates list`: Built-in templates, then saved ones
//! - `formcraft templates show <id>`: Fields of one template
//! - `formcraft templates import <file>`: Save a YAML/JSON field list as a template
//! - `formcraft templates edit <id>`: Change a template and save it as a new one
//! - `formcraft templates delete <id>`: Delete a saved template
//! - `formcraft fill <id>`: Answer a template and submit it
//! - `formcraft build --field SPEC...`: Compose a form, then preview, save or submit it
//! - `formcraft submissions list|show|delete|last`: Browse stored submissions
//!
//! Environment variables:
//! - FORMCRAFT_DATA_DIR: Directory holding submissions and templates
//! - FORMCRAFT_DEFAULT_TITLE: Title of forms created with `build`
//! - FORMCRAFT_SHORT_FORM: Only ask short-form fields
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error, unknown id, or required fields left empty

use clap::Parser;
use tracing_subscriber::EnvFilter;

use formcraft_cli::fill::{self, BuildOptions, FillOptions};
use formcraft_cli::templates::{self, TemplateEdits};
use formcraft_cli::{submissions, CliError, Context};
use formcraft_cli::{Cli, Commands, SubmissionAction, TemplateAction};

/// Map a command result to an exit code, reporting the error.
fn handle_result(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Templates { action } => match action {
            TemplateAction::List { json } => templates::run_list(ctx, json),
            TemplateAction::Show { id, json } => templates::run_show(ctx, &id, json),
            TemplateAction::Import { file } => templates::run_import(ctx, &file),
            TemplateAction::Edit {
                id,
                title,
                add,
                remove,
                moves,
                rename,
                require,
                short_form,
                add_option,
                option,
                remove_option,
            } => templates::run_edit(
                ctx,
                &id,
                TemplateEdits {
                    title,
                    remove,
                    add,
                    moves,
                    rename,
                    require,
                    short_form,
                    add_option,
                    option,
                    remove_option,
                },
            ),
            TemplateAction::Delete { id } => templates::run_delete(ctx, &id),
        },

        Commands::Fill {
            template,
            answers,
            short_form,
            interactive,
            json,
        } => fill::run_fill(
            ctx,
            &template,
            FillOptions {
                answers,
                short_form,
                interactive,
                json,
            },
        ),

        Commands::Build {
            title,
            fields,
            answers,
            save,
            submit,
        } => fill::run_build(
            ctx,
            BuildOptions {
                title,
                fields,
                answers,
                save,
                submit,
            },
        ),

        Commands::Submissions { action } => match action {
            SubmissionAction::List { json } => submissions::run_list(ctx, json),
            SubmissionAction::Show { id, json } => submissions::run_show(ctx, &id, json),
            SubmissionAction::Delete { id } => submissions::run_delete(ctx, &id),
            SubmissionAction::Last => submissions::run_last(ctx),
        },
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("formcraft=debug,formcraft_store=debug,formcraft_fields=debug,formcraft_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match Context::load(cli.data_dir) {
        Ok(ctx) => handle_result(run(&ctx, cli.command)),
        Err(e) => handle_result(Err(e)),
    };

    std::process::exit(exit_code);
}
