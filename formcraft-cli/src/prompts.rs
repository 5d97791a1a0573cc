//! Interactive answering with dialoguer, one prompt per input field.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{FuzzySelect, Input, MultiSelect, Select};
use formcraft::fields::{Affordance, Choice, FieldId, ResponseValue};
use formcraft::FormSession;

use crate::error::Result;

fn prompt_text(caption: &str, required: bool) -> String {
    if required {
        format!("{caption} *")
    } else {
        caption.to_string()
    }
}

fn labels(choices: &[Choice]) -> Vec<&str> {
    choices.iter().map(|c| c.label.as_str()).collect()
}

/// Ask for one field's answer based on how it renders. `None` for
/// fields that take no input.
fn ask(session: &FormSession, id: &FieldId) -> Result<Option<ResponseValue>> {
    let Some(field) = session.field(id) else {
        return Ok(None);
    };
    let rendered = session.render_field(field);
    if !rendered.accepts_input() {
        return Ok(None);
    }
    let prompt = prompt_text(&field.result_key(), field.required);
    let theme = ColorfulTheme::default();

    let value = match &rendered.affordance {
        Affordance::StaticText { .. } | Affordance::Separator => return Ok(None),
        Affordance::RadioGroup { choices, .. }
        | Affordance::CheckboxGroup { choices }
        | Affordance::TagChips { choices }
            if choices.is_empty() =>
        {
            return Ok(None)
        }
        Affordance::TextInput { value } | Affordance::NumberInput { value } => {
            let input = Input::<String>::with_theme(&theme)
                .with_prompt(prompt)
                .with_initial_text(value.clone())
                .allow_empty(true)
                .interact_text()?;
            ResponseValue::Text(input)
        }
        Affordance::Select {
            placeholder,
            choices,
        } => {
            let mut items = vec![*placeholder];
            items.extend(labels(choices));
            let picked = FuzzySelect::with_theme(&theme)
                .with_prompt(prompt)
                .items(&items)
                .default(0)
                .interact()?;
            match picked.checked_sub(1).and_then(|i| choices.get(i)) {
                Some(choice) => ResponseValue::Text(choice.value.clone()),
                None => ResponseValue::text(""),
            }
        }
        Affordance::RadioGroup { choices, .. } => {
            let picked = Select::with_theme(&theme)
                .with_prompt(prompt)
                .items(&labels(choices))
                .default(choices.iter().position(|c| c.selected).unwrap_or(0))
                .interact()?;
            match choices.get(picked) {
                Some(choice) => ResponseValue::Text(choice.value.clone()),
                None => return Ok(None),
            }
        }
        Affordance::CheckboxGroup { choices } | Affordance::TagChips { choices } => {
            let defaults: Vec<bool> = choices.iter().map(|c| c.selected).collect();
            let picked = MultiSelect::with_theme(&theme)
                .with_prompt(format!("{prompt} (space to select, enter to confirm)"))
                .items(&labels(choices))
                .defaults(&defaults)
                .interact()?;
            ResponseValue::Selection(
                picked
                    .into_iter()
                    .filter_map(|i| choices.get(i))
                    .map(|c| c.value.clone())
                    .collect(),
            )
        }
    };
    Ok(Some(value))
}

/// Prompt for every visible input field that has no answer yet.
pub fn answer_unanswered(session: &mut FormSession) -> Result<()> {
    let pending: Vec<FieldId> = session
        .visible_fields()
        .filter(|f| f.field_type().accepts_input() && session.responses().get(&f.id).is_none())
        .map(|f| f.id.clone())
        .collect();
    answer(session, &pending)?;
    Ok(())
}

/// Prompt for each of `ids` in order and record the answers. Returns how
/// many fields could be prompted; fields with nothing to choose are skipped.
pub fn answer(session: &mut FormSession, ids: &[FieldId]) -> Result<usize> {
    let mut answered = 0;
    for id in ids {
        if let Some(value) = ask(session, id)? {
            session.set_response(id.clone(), value);
            answered += 1;
        }
    }
    Ok(answered)
}
