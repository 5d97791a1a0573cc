//! CLI definition for the Formcraft command-line interface.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use formcraft::fields::{FieldOption, FieldType};

/// Formcraft - build, fill and store dynamic forms.
///
/// Forms are made of typed fields (headers, text inputs, dropdowns,
/// checkboxes, multiple choice, tags, ...). Start from a built-in template
/// (feedback, registration, survey) or one you saved earlier, answer it,
/// and the submission is stored under the data directory.
#[derive(Parser, Debug)]
#[command(name = "formcraft")]
#[command(version)]
#[command(about = "Build, fill and store dynamic forms")]
#[command(
    long_about = "Formcraft builds forms from a palette of field types, fills them in, \
    and keeps submissions and saved templates as JSON files.\n\n\
    Environment variables:\n  \
    FORMCRAFT_DATA_DIR       Directory holding submissions and templates\n  \
    FORMCRAFT_DEFAULT_TITLE  Title of forms created with `build`\n  \
    FORMCRAFT_SHORT_FORM     Only ask short-form fields (true/false)"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Override the data directory
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage built-in and saved templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Fill in a template and submit it
    Fill {
        /// Template id (feedback, registration, survey, or a saved id)
        template: String,
        /// Answer a field: KEY=VALUE where KEY is a field id or label.
        /// Separate several choices with commas.
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
        /// Only ask fields marked for the short form
        #[arg(long)]
        short_form: bool,
        /// Prompt for every unanswered field
        #[arg(short, long)]
        interactive: bool,
        /// Print the submitted result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compose a new form from field specs
    Build {
        /// Form title
        #[arg(long)]
        title: Option<String>,
        /// Field spec TYPE[!][:LABEL[:OPTION,OPTION...]]; `!` marks it required
        #[arg(long = "field", value_name = "SPEC", required = true)]
        fields: Vec<FieldSpec>,
        /// Answer a field: KEY=VALUE where KEY is a field label
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
        /// Save the composed form as a new template
        #[arg(long)]
        save: bool,
        /// Submit the composed form with the given answers
        #[arg(long)]
        submit: bool,
    },

    /// Inspect stored submissions
    Submissions {
        #[command(subcommand)]
        action: SubmissionAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List built-in templates, then saved ones (newest first)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the fields of a template
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save the fields of a YAML or JSON file as a new template
    Import {
        /// File with `title` and `fields`
        file: PathBuf,
    },

    /// Edit a template and save the result as a new template
    Edit {
        id: String,
        /// Title of the new template
        #[arg(long)]
        title: Option<String>,
        /// Append a field of this type
        #[arg(long = "add", value_name = "TYPE")]
        add: Vec<FieldType>,
        /// Remove the field with this id
        #[arg(long = "remove", value_name = "ID")]
        remove: Vec<String>,
        /// Move a field: FROM:TO positions, starting at 0
        #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,
        /// Rename a field: ID=LABEL
        #[arg(long = "rename", value_name = "ID=LABEL", value_parser = parse_answer)]
        rename: Vec<(String, String)>,
        /// Toggle whether a field is required
        #[arg(long = "require", value_name = "ID")]
        require: Vec<String>,
        /// Toggle whether a field shows on the short form
        #[arg(long = "short-form", value_name = "ID")]
        short_form: Vec<String>,
        /// Append an "Option" entry to a field
        #[arg(long = "add-option", value_name = "ID")]
        add_option: Vec<String>,
        /// Set option text: ID:INDEX=TEXT
        #[arg(long = "option", value_name = "ID:INDEX=TEXT", value_parser = parse_option_edit)]
        option: Vec<OptionEdit>,
        /// Remove an option: ID:INDEX
        #[arg(long = "remove-option", value_name = "ID:INDEX", value_parser = parse_option_ref)]
        remove_option: Vec<(String, usize)>,
    },

    /// Delete a saved template
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SubmissionAction {
    /// List submissions, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one submission
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one submission
    Delete { id: String },

    /// Show the most recently submitted result
    Last,
}

/// A field described on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub required: bool,
    pub label: Option<String>,
    pub options: Vec<String>,
}

impl FromStr for FieldSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let head = parts.next().unwrap_or_default().trim();
        let (type_name, required) = match head.strip_suffix('!') {
            Some(name) => (name, true),
            None => (head, false),
        };
        let field_type = type_name.parse::<FieldType>().map_err(|e| e.to_string())?;
        let label = parts
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        let options: Vec<String> = parts
            .next()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if !options.is_empty() && !field_type.is_option_bearing() {
            return Err(format!("{field_type} fields do not take options"));
        }
        let mut tokens = HashSet::new();
        for option in &options {
            let token = FieldOption::from_label(option.as_str()).value;
            if !tokens.insert(token.clone()) {
                return Err(format!("options collide on the value '{token}'"));
            }
        }

        Ok(Self {
            field_type,
            required,
            label,
            options,
        })
    }
}

/// An option label change from `--option ID:INDEX=TEXT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEdit {
    pub field: String,
    pub index: usize,
    pub text: String,
}

fn parse_answer(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_move(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{s}'"))?;
    let parse = |n: &str| {
        n.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{n}' is not a position"))
    };
    Ok((parse(from)?, parse(to)?))
}

fn parse_option_ref(s: &str) -> Result<(String, usize), String> {
    let (field, index) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ID:INDEX, got '{s}'"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{index}' is not an option index"))?;
    Ok((field.trim().to_string(), index))
}

fn parse_option_edit(s: &str) -> Result<OptionEdit, String> {
    let (target, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID:INDEX=TEXT, got '{s}'"))?;
    let (field, index) = parse_option_ref(target)?;
    Ok(OptionEdit {
        field,
        index,
        text: text.to_string(),
    })
}
