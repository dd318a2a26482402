//! Generic resource form controller.
//!
//! One [`ResourceForm`] drives any record type implementing [`FormResource`]:
//! it resolves the mode from the route, builds the form, loads the record in
//! edit mode and coordinates submission.

pub mod form;
pub mod loader;
pub mod reference;
pub mod resources;
pub mod submit;

pub use form::{FormContext, ResourceForm};
pub use loader::switch_to_latest;
pub use reference::{ReferenceList, SelectOption};
pub use resources::{CategoryForm, EntryForm, EntryFormPage};
pub use submit::{SubmitFailure, SubmitOutcome, SubmitState};

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::{Identifiable, NamedEntity};
use crate::forms::FormSchema;

/// Capabilities a record type needs to be edited through a [`ResourceForm`].
pub trait FormResource:
    Identifiable + NamedEntity + Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Route collection, e.g. `categories`.
    const COLLECTION: &'static str;
    /// Page title in create mode.
    const NEW_TITLE: &'static str;
    /// Page title prefix in edit mode; the record name is appended.
    const EDIT_TITLE_PREFIX: &'static str;

    fn build_schema() -> FormSchema;
}
