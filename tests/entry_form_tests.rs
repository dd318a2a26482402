mod common;

use std::sync::Arc;

use common::{route, Harness};
use finance_core::{
    controller::{EntryFormPage, SubmitFailure, SubmitOutcome, SubmitState},
    domain::{Category, Entry, EntryType},
    errors::{ControllerError, FormError},
    notify::{NotificationKind, SUCCESS_MESSAGE},
    services::{Fault, Method, ResourceService, ENTRIES},
};
use serde_json::json;

fn entry_page(harness: &Harness, path: &str) -> EntryFormPage {
    EntryFormPage::new(
        route(path),
        Arc::clone(&harness.entries) as Arc<dyn ResourceService<Entry>>,
        Arc::clone(&harness.categories) as Arc<dyn ResourceService<Category>>,
        harness.context(),
    )
}

fn fill_valid(page: &mut EntryFormPage) {
    let form = page.form.form_mut();
    form.set_input("name", "Test").unwrap();
    form.set_input("amount", "10,00").unwrap();
    form.set_input("date", "20/10/2018").unwrap();
    form.set_input("categoryId", "1").unwrap();
}

#[tokio::test]
async fn new_entry_form_loads_category_options() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");

    page.init().await.unwrap();

    assert_eq!(page.form.page_title(), "Cadastro de Novo Lançamento");
    assert_eq!(page.form.form().get("type"), Some(&json!("expense")));
    assert_eq!(page.form.form().get("paid"), Some(&json!(true)));
    assert_eq!(page.categories.options().len(), 5);
    assert_eq!(page.categories.text_for(4), Some("Salário"));
}

#[tokio::test]
async fn edit_form_patches_the_entry_and_its_category_id() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/3/edit");

    page.init().await.unwrap();

    let form = page.form.form();
    assert_eq!(page.form.page_title(), "Editando Lançamento: Salário na empresa X");
    assert_eq!(form.get("type"), Some(&json!("revenue")));
    assert_eq!(form.get("amount"), Some(&json!("4405,49")));
    assert_eq!(form.get("categoryId"), Some(&json!(4)));
    assert!(form.get("category").is_none());
    assert_eq!(page.form.resource().entry_type, EntryType::Revenue);
}

#[tokio::test]
async fn category_failure_does_not_hide_the_record() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    harness.api.inject_fault(Fault::Status {
        status: 500,
        body: None,
    });

    let err = page.init().await.unwrap_err();

    assert!(matches!(err, ControllerError::ReferenceData(_)));
    assert!(page.categories.options().is_empty());
    assert!(harness.notifier.notifications().is_empty());
}

#[tokio::test]
async fn creating_an_entry_redirects_to_its_edit_form() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    page.init().await.unwrap();
    fill_valid(&mut page);
    assert!(page.form.can_submit());

    let outcome = page.form.submit().await.unwrap();

    let saved = match outcome {
        SubmitOutcome::Saved(saved) => saved,
        other => panic!("expected saved outcome, got {other:?}"),
    };
    assert_eq!(saved.id, Some(6));
    assert_eq!(saved.category.as_ref().map(|c| c.name.as_str()), Some("Moradia"));
    assert_eq!(harness.api.count(ENTRIES), 6);
    assert_eq!(harness.router.current_url().as_deref(), Some("entries/6/edit"));

    let notifications = harness.notifier.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
    assert_eq!(notifications[0].message, SUCCESS_MESSAGE);

    let mut reopened = entry_page(&harness, "entries/6/edit");
    reopened.init().await.unwrap();
    assert_eq!(reopened.form.page_title(), "Editando Lançamento: Test");
    assert_eq!(reopened.form.form().get("paid"), Some(&json!(true)));
}

#[tokio::test]
async fn backend_rejections_are_listed_under_the_form() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    fill_valid(&mut page);
    page.form.form_mut().set_input("date", "2018-10-20").unwrap();
    page.form.form_mut().set_input("amount", "dez").unwrap();

    let outcome = page.form.submit().await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmitFailure::Validation(vec![
            "amount must be a valid decimal".to_string(),
            "date must use dd/mm/yyyy".to_string(),
        ]))
    );
    assert_eq!(page.form.state(), SubmitState::Failed);
    assert_eq!(harness.api.count(ENTRIES), 5);
}

#[tokio::test]
async fn write_failures_survive_the_category_lookup() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    fill_valid(&mut page);
    harness.api.inject_fault_on(
        Method::Post,
        Fault::Status {
            status: 422,
            body: Some(json!({ "errors": ["Lançamento duplicado"] }).to_string()),
        },
    );

    let outcome = page.form.submit().await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmitFailure::Validation(vec![
            "Lançamento duplicado".to_string()
        ]))
    );
    assert_eq!(harness.api.count(ENTRIES), 5);

    let retried = page.form.submit().await.unwrap();
    assert!(matches!(retried, SubmitOutcome::Saved(_)));
}

#[tokio::test]
async fn unknown_category_is_rejected_by_the_backend() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    fill_valid(&mut page);
    page.form.form_mut().set_input("categoryId", "42").unwrap();

    page.form.submit().await.unwrap();

    assert_eq!(
        page.form.server_error_messages(),
        Some(&["categoryId must reference an existing category".to_string()][..])
    );
}

#[tokio::test]
async fn missing_required_fields_block_submission() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    page.form.form_mut().set_input("name", "Test").unwrap();

    let outcome = page.form.submit().await.unwrap();

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected invalid outcome");
    };
    let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
    assert_eq!(fields, vec!["amount", "date", "categoryId"]);
    assert_eq!(harness.api.count(ENTRIES), 5);
}

#[tokio::test]
async fn mistyped_values_never_reach_the_form() {
    let harness = Harness::seeded();
    let mut page = entry_page(&harness, "entries/new");
    fill_valid(&mut page);

    let err = page.form.form_mut().set("categoryId", json!("1")).unwrap_err();

    assert!(matches!(err, FormError::InvalidInput { .. }));
    assert_eq!(page.form.form().get("categoryId"), Some(&json!(1)));
    let outcome = page.form.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
}

#[test]
fn entry_page_titles() {
    let harness = Harness::seeded();
    let page = entry_page(&harness, "entries/new");
    insta::assert_snapshot!(page.form.page_title(), @"Cadastro de Novo Lançamento");
}
