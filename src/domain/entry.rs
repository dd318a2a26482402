//! Financial entries (expenses and revenues).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::currency;
use crate::domain::category::Category;
use crate::domain::common::*;

/// Whether an entry takes money out or brings it in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Expense,
    Revenue,
}

impl EntryType {
    pub const ALL: [EntryType; 2] = [EntryType::Expense, EntryType::Revenue];

    /// Wire value used in JSON bodies and select controls.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Expense => "expense",
            EntryType::Revenue => "revenue",
        }
    }

    /// Localized label shown next to the option.
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Expense => "Despesa",
            EntryType::Revenue => "Receita",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A dated expense or revenue linked to a [`Category`] by id.
///
/// `category` is a denormalized snapshot filled by the backend; forms never
/// declare it, so it is dropped whenever a record is rebuilt from form values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        entry_type: EntryType,
        amount: impl Into<String>,
        date: impl Into<String>,
        category_id: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            entry_type,
            amount: amount.into(),
            date: date.into(),
            paid: true,
            category_id,
            category: None,
        }
    }

    pub fn paid_text(&self) -> &'static str {
        if self.paid {
            "Pago"
        } else {
            "Pendente"
        }
    }

    /// Amount in cents, or `None` when the text is not a valid decimal.
    pub fn amount_cents(&self) -> Option<i64> {
        currency::parse_amount(&self.amount).ok()
    }
}

impl Identifiable for Entry {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl NamedEntity for Entry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Entry {
    fn display_label(&self) -> String {
        format!(
            "{} | {} | R$ {} | {} | {}",
            self.date,
            self.name,
            self.amount,
            self.entry_type,
            self.paid_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_uses_camel_case_keys() {
        let entry = Entry::new("Aluguel", EntryType::Expense, "900,00", "01/11/2018", 1);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "Aluguel",
                "type": "expense",
                "amount": "900,00",
                "date": "01/11/2018",
                "paid": true,
                "categoryId": 1
            })
        );
    }

    #[test]
    fn parses_entry_type_case_insensitively() {
        assert_eq!(EntryType::parse("Revenue"), Some(EntryType::Revenue));
        assert_eq!(EntryType::parse("transfer"), None);
    }

    #[test]
    fn paid_text_reflects_status() {
        let mut entry = Entry::default();
        assert_eq!(entry.paid_text(), "Pendente");
        entry.paid = true;
        assert_eq!(entry.paid_text(), "Pago");
    }

    #[test]
    fn amount_cents_reads_localized_decimal() {
        let entry = Entry::new("Salário", EntryType::Revenue, "4405,49", "15/10/2018", 4);
        assert_eq!(entry.amount_cents(), Some(440_549));
    }
}
