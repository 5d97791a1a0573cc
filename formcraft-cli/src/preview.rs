//! Text rendering of fields for the terminal.

use formcraft::fields::{Affordance, Choice, FieldConfig, Rendered, TextStyle};
use formcraft::FormSession;

use crate::table::{flag, new_table, truncate_str};

fn choice_list(choices: &[Choice]) -> String {
    choices
        .iter()
        .map(|c| {
            if c.selected {
                format!("[{}]", c.label)
            } else {
                c.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// One-line description of an affordance.
pub fn describe(affordance: &Affordance) -> String {
    match affordance {
        Affordance::StaticText { style, text } => match style {
            TextStyle::Heading => format!("# {text}"),
            TextStyle::Label => text.clone(),
            TextStyle::Paragraph => truncate_str(text, 60),
        },
        Affordance::Separator => "----".to_string(),
        Affordance::TextInput { value } => format!("text: {value}"),
        Affordance::NumberInput { value } => format!("number: {value}"),
        Affordance::Select {
            placeholder,
            choices,
        } => {
            let picked = choices.iter().find(|c| c.selected);
            match picked {
                Some(choice) => format!("select: {}", choice.label),
                None => format!("select: {placeholder} ({})", choice_list(choices)),
            }
        }
        Affordance::CheckboxGroup { choices } => format!("checkboxes: {}", choice_list(choices)),
        Affordance::RadioGroup { choices, .. } => format!("one of: {}", choice_list(choices)),
        Affordance::TagChips { choices } => format!("tags: {}", choice_list(choices)),
    }
}

fn rendered_row(rendered: &Rendered) -> Vec<String> {
    vec![
        rendered.caption.clone().unwrap_or_default(),
        describe(&rendered.affordance),
        rendered.message.unwrap_or_default().to_string(),
    ]
}

/// The session's visible fields as they would be shown to a filler.
pub fn print_preview(session: &FormSession) {
    println!("{}", session.title());
    let mut table = new_table();
    table.set_header(vec!["Field", "Input", ""]);
    for field in session.visible_fields() {
        table.add_row(rendered_row(&session.render_field(field)));
    }
    println!("{table}");
}

/// Field configuration table used by `templates show`.
pub fn print_fields(title: &str, fields: &[FieldConfig]) {
    println!("{title}");
    let mut table = new_table();
    table.set_header(vec!["#", "ID", "Type", "Label", "Required", "Short form", "Options"]);
    for (index, field) in fields.iter().enumerate() {
        let options = field
            .options()
            .map(|opts| {
                opts.iter()
                    .map(|o| o.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        table.add_row(vec![
            index.to_string(),
            field.id.to_string(),
            field.field_type().to_string(),
            truncate_str(&field.label, 50),
            flag(field.required).to_string(),
            flag(field.display_on_short_form).to_string(),
            options,
        ]);
    }
    println!("{table}");
}
