/// Identifies records that carry a server-assigned identifier once persisted.
pub trait Identifiable {
    fn id(&self) -> Option<i64>;
}

/// Provides access to a human-friendly record name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
