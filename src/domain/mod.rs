//! Resource records exchanged with the REST backend.

pub mod category;
pub mod common;
pub mod entry;

pub use category::Category;
pub use common::{Displayable, Identifiable, NamedEntity};
pub use entry::{Entry, EntryType};
