use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde_json::Value;

use crate::cli::CommandError;
use crate::controller::SelectOption;
use crate::forms::{FieldKind, FormGroup};

pub(crate) fn confirm(prompt: &str) -> Result<bool, CommandError> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Prompts for every editable field, pre-filled with the current values.
/// `categories` turns `categoryId` into a selection.
pub(crate) fn fill_form(
    form: &mut FormGroup,
    categories: Option<&[SelectOption]>,
) -> Result<(), CommandError> {
    let theme = ColorfulTheme::default();
    let fields = form.schema().fields.clone();

    for field in fields.iter().filter(|field| field.key != "id") {
        let current = form.get(field.key).cloned().unwrap_or(Value::Null);
        let value = match (&field.kind, categories) {
            (FieldKind::Integer, Some(options)) if field.key == "categoryId" && !options.is_empty() => {
                let labels: Vec<&str> = options.iter().map(|option| option.text.as_str()).collect();
                let default = options
                    .iter()
                    .position(|option| current.as_i64() == Some(option.value))
                    .unwrap_or(0);
                let picked = Select::with_theme(&theme)
                    .with_prompt(field.key)
                    .items(&labels)
                    .default(default)
                    .interact()?;
                options
                    .get(picked)
                    .map(|option| Value::from(option.value))
                    .unwrap_or(Value::Null)
            }
            (FieldKind::Boolean, _) => Value::Bool(
                Confirm::with_theme(&theme)
                    .with_prompt(field.key)
                    .default(current.as_bool().unwrap_or(false))
                    .interact()?,
            ),
            (FieldKind::Choice(options), _) => {
                let default = options
                    .iter()
                    .position(|option| current.as_str() == Some(*option))
                    .unwrap_or(0);
                let picked = Select::with_theme(&theme)
                    .with_prompt(field.key)
                    .items(options)
                    .default(default)
                    .interact()?;
                options
                    .get(picked)
                    .map(|option| Value::String((*option).to_string()))
                    .unwrap_or(Value::Null)
            }
            _ => {
                let initial = match &current {
                    Value::Null => String::new(),
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                let raw: String = Input::with_theme(&theme)
                    .with_prompt(field.key)
                    .with_initial_text(initial)
                    .allow_empty(true)
                    .interact_text()?;
                field.parse_input(&raw)?
            }
        };
        form.set(field.key, value)?;
    }
    Ok(())
}
