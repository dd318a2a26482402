//! Command implementations for the shell.

use serde_json::Value;

use crate::cli::context::{CliMode, Page, ShellContext};
use crate::cli::{output, prompts, CommandError};
use crate::controller::{EntryFormPage, FormResource, ResourceForm, SubmitOutcome};
use crate::currency;
use crate::domain::Displayable;
use crate::forms::FieldError;
use crate::services::ResourceService;
use crate::utils::build_info;

const HELP: [(&str, &str); 9] = [
    ("list <categories|entries>", "List stored records"),
    ("open <collection>/new", "Open an empty creation form"),
    ("open <collection>/<id>/edit", "Open the edit form of a record"),
    ("set <field> <value>", "Change a field of the open form"),
    ("fill", "Prompt for every field of the open form"),
    ("show", "Show the open form"),
    ("submit", "Validate and save the open form"),
    ("version", "Show build information"),
    ("exit", "Leave the shell"),
];

pub(crate) fn help() -> Result<(), CommandError> {
    output::section("Commands");
    for (usage, description) in HELP {
        output::line(format!("  {:<30} {}", usage, description));
    }
    Ok(())
}

pub(crate) fn version() -> Result<(), CommandError> {
    output::info(build_info::current().summary());
    Ok(())
}

pub(crate) fn list(context: &ShellContext, args: &[&str]) -> Result<(), CommandError> {
    match args {
        ["categories"] => {
            let categories = context.runtime.block_on(context.categories.get_all())?;
            output::section("Categorias");
            for category in categories {
                output::line(format!(
                    "  [{}] {}",
                    category.id.unwrap_or_default(),
                    category.display_label()
                ));
            }
            Ok(())
        }
        ["entries"] => {
            let entries = context.runtime.block_on(context.entries.get_all())?;
            let currency = context.config().currency.as_str();
            output::section("Lançamentos");
            for entry in entries {
                let amount = entry
                    .amount_cents()
                    .map(currency::format_amount)
                    .unwrap_or_else(|| entry.amount.clone());
                let category = entry
                    .category
                    .as_ref()
                    .map(|category| category.name.as_str())
                    .unwrap_or("-");
                output::line(format!(
                    "  [{}] {} | {} | {} {} | {} | {} | {}",
                    entry.id.unwrap_or_default(),
                    entry.date,
                    entry.name,
                    currency,
                    amount,
                    entry.entry_type,
                    entry.paid_text(),
                    category
                ));
            }
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "Usage: list <categories|entries>".into(),
        )),
    }
}

pub(crate) fn set(context: &mut ShellContext, args: &[&str]) -> Result<(), CommandError> {
    let (field, rest) = match args {
        [field, rest @ ..] => (*field, rest),
        [] => {
            return Err(CommandError::InvalidArguments(
                "Usage: set <field> <value>".into(),
            ))
        }
    };
    let raw = rest.join(" ");
    let form = match context.page.as_mut().ok_or(CommandError::NoPage)? {
        Page::Category(form) => form.form_mut(),
        Page::Entry(page) => page.form.form_mut(),
    };
    form.set_input(field, &raw)?;
    output::info(format!(
        "{} = {}",
        field,
        display_value(form.get(field).unwrap_or(&Value::Null))
    ));
    Ok(())
}

pub(crate) fn fill(context: &mut ShellContext) -> Result<(), CommandError> {
    if context.mode == CliMode::Script {
        return Err(CommandError::InvalidArguments(
            "`fill` needs an interactive terminal; use `set` in scripts.".into(),
        ));
    }
    match context.page.as_mut().ok_or(CommandError::NoPage)? {
        Page::Category(form) => prompts::fill_form(form.form_mut(), None)?,
        Page::Entry(page) => {
            let options = page.categories.options().to_vec();
            prompts::fill_form(page.form.form_mut(), Some(&options))?;
        }
    }
    show(context)
}

pub(crate) fn show(context: &ShellContext) -> Result<(), CommandError> {
    match context.page.as_ref().ok_or(CommandError::NoPage)? {
        Page::Category(form) => render_form(form),
        Page::Entry(page) => {
            render_form(&page.form);
            render_entry_options(page);
        }
    }
    Ok(())
}

fn render_form<R: FormResource>(form: &ResourceForm<R>) {
    output::section(form.page_title());
    for field in &form.form().schema().fields {
        let marker = if field.is_required() { "*" } else { " " };
        let value = form.form().get(field.key).unwrap_or(&Value::Null);
        output::line(format!("  {}{:<12} {}", marker, field.key, display_value(value)));
    }
    if let Err(errors) = form.form().validate() {
        render_field_errors(&errors);
    }
    if let Some(messages) = form.server_error_messages() {
        for message in messages {
            output::line(format!("  ! {}", message));
        }
    }
}

fn render_entry_options(page: &EntryFormPage) {
    let types: Vec<String> = EntryFormPage::type_options()
        .into_iter()
        .map(|(value, label)| format!("{value} ({label})"))
        .collect();
    output::line(format!("  type options: {}", types.join(", ")));

    let categories: Vec<String> = page
        .categories
        .options()
        .iter()
        .map(|option| format!("{}={}", option.value, option.text))
        .collect();
    output::line(format!("  categoryId options: {}", categories.join(", ")));
}

fn render_field_errors(errors: &[FieldError]) {
    for error in errors {
        output::line(format!("  - {}", error));
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Non-generic view of a submit outcome.
enum Submitted {
    Saved,
    Invalid(Vec<FieldError>),
    Failed(Vec<String>),
}

fn summarize<R: FormResource>(form: &ResourceForm<R>, outcome: SubmitOutcome<R>) -> Submitted {
    match outcome {
        SubmitOutcome::Saved(_) => Submitted::Saved,
        SubmitOutcome::Invalid(errors) => Submitted::Invalid(errors),
        SubmitOutcome::Failed(_) => {
            Submitted::Failed(form.server_error_messages().unwrap_or_default().to_vec())
        }
    }
}

pub(crate) fn submit(context: &mut ShellContext) -> Result<(), CommandError> {
    let submitted = match context.page.as_mut().ok_or(CommandError::NoPage)? {
        Page::Category(form) => {
            let outcome = context.runtime.block_on(form.submit())?;
            summarize(form, outcome)
        }
        Page::Entry(page) => {
            let outcome = context.runtime.block_on(page.form.submit())?;
            summarize(&page.form, outcome)
        }
    };

    match submitted {
        Submitted::Saved => context.reopen_current(),
        Submitted::Invalid(errors) => {
            output::warning("The form has invalid fields:");
            render_field_errors(&errors);
            Ok(())
        }
        Submitted::Failed(messages) => {
            for message in messages {
                output::line(format!("  ! {}", message));
            }
            Ok(())
        }
    }
}
