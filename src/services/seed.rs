//! Sample data loaded into a fresh [`InMemoryApi`](super::InMemoryApi).

use crate::domain::{Category, Entry, EntryType};

pub fn categories() -> Vec<Category> {
    vec![
        Category::new("Moradia")
            .with_id(1)
            .with_description("Pagamentos de conta da casa"),
        Category::new("Saúde")
            .with_id(2)
            .with_description("Plano de saúde e remédios"),
        Category::new("Lazer")
            .with_id(3)
            .with_description("Cinema, parques, praia, etc"),
        Category::new("Salário")
            .with_id(4)
            .with_description("Recebimento de salário"),
        Category::new("Freelas")
            .with_id(5)
            .with_description("Trabalhos como freelancer"),
    ]
}

pub fn entries() -> Vec<Entry> {
    let categories = categories();
    let entry = |id: i64, name: &str, entry_type: EntryType, amount: &str, date: &str, category_id: i64| {
        let mut entry = Entry::new(name, entry_type, amount, date, category_id);
        entry.id = Some(id);
        entry.category = categories.iter().find(|c| c.id == Some(category_id)).cloned();
        entry
    };

    let mut gas = entry(1, "Gas de cozinha", EntryType::Expense, "70,80", "14/10/2018", 1);
    gas.description = Some("Qquer descric".to_string());
    let mut supplements = entry(2, "Suplementos", EntryType::Expense, "15,00", "14/10/2018", 2);
    supplements.paid = false;

    vec![
        gas,
        supplements,
        entry(3, "Salário na empresa X", EntryType::Revenue, "4405,49", "15/10/2018", 4),
        entry(4, "Aluguel de filme", EntryType::Expense, "15,00", "16/10/2018", 3),
        entry(5, "Suplementos", EntryType::Expense, "30,00", "17/10/2018", 2),
    ]
}
