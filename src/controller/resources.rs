//! Category and entry forms.

use std::sync::Arc;

use crate::controller::form::{FormContext, ResourceForm};
use crate::controller::reference::ReferenceList;
use crate::controller::FormResource;
use crate::domain::{Category, Entry, EntryType};
use crate::errors::ControllerError;
use crate::forms::{FieldDescriptor, FieldKind, FormSchema, Validator};
use crate::navigation::FormRoute;
use crate::services::{ResourceService, CATEGORIES, ENTRIES};

pub type CategoryForm = ResourceForm<Category>;
pub type EntryForm = ResourceForm<Entry>;

impl FormResource for Category {
    const COLLECTION: &'static str = CATEGORIES;
    const NEW_TITLE: &'static str = "Cadastro de Nova Categoria";
    const EDIT_TITLE_PREFIX: &'static str = "Editando Categoria: ";

    fn build_schema() -> FormSchema {
        FormSchema::new(
            "category",
            vec![
                FieldDescriptor::new("id", FieldKind::Integer),
                FieldDescriptor::new("name", FieldKind::Text)
                    .with_validators(vec![Validator::Required, Validator::MinLength(4)]),
                FieldDescriptor::new("description", FieldKind::Text),
            ],
        )
    }
}

const ENTRY_TYPES: [&str; 2] = ["expense", "revenue"];

impl FormResource for Entry {
    const COLLECTION: &'static str = ENTRIES;
    const NEW_TITLE: &'static str = "Cadastro de Novo Lançamento";
    const EDIT_TITLE_PREFIX: &'static str = "Editando Lançamento: ";

    fn build_schema() -> FormSchema {
        FormSchema::new(
            "entry",
            vec![
                FieldDescriptor::new("id", FieldKind::Integer),
                FieldDescriptor::new("name", FieldKind::Text)
                    .with_validators(vec![Validator::Required, Validator::MinLength(2)]),
                FieldDescriptor::new("description", FieldKind::Text),
                FieldDescriptor::new("type", FieldKind::Choice(ENTRY_TYPES.to_vec()))
                    .with_default(EntryType::Expense.as_str())
                    .with_validators(vec![
                        Validator::Required,
                        Validator::OneOf(ENTRY_TYPES.to_vec()),
                    ]),
                FieldDescriptor::new("amount", FieldKind::Text)
                    .with_validators(vec![Validator::Required]),
                FieldDescriptor::new("date", FieldKind::Text)
                    .with_validators(vec![Validator::Required]),
                FieldDescriptor::new("paid", FieldKind::Boolean)
                    .with_default(true)
                    .with_validators(vec![Validator::Required]),
                FieldDescriptor::new("categoryId", FieldKind::Integer)
                    .with_validators(vec![Validator::Required]),
            ],
        )
    }
}

/// Entry form plus the category options its select control needs.
pub struct EntryFormPage {
    pub form: EntryForm,
    pub categories: ReferenceList<Category>,
}

impl EntryFormPage {
    pub fn new(
        route: FormRoute,
        entries: Arc<dyn ResourceService<Entry>>,
        categories: Arc<dyn ResourceService<Category>>,
        context: FormContext,
    ) -> Self {
        Self {
            form: ResourceForm::new(route, entries, context),
            categories: ReferenceList::new(categories),
        }
    }

    /// Loads the entry (edit mode) and the category options concurrently.
    /// A load failure takes precedence over a reference-data failure.
    pub async fn init(&mut self) -> Result<(), ControllerError> {
        let (loaded, options) = tokio::join!(self.form.init(), self.categories.load());
        loaded?;
        options
    }

    /// `(value, label)` pairs for the type select control.
    pub fn type_options() -> Vec<(&'static str, &'static str)> {
        EntryType::ALL
            .iter()
            .map(|kind| (kind.as_str(), kind.label()))
            .collect()
    }
}
