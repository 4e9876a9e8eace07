#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;

use super::*;
use crate::api::Method;
use crate::models::Transaction;
use crate::test_support::{self, category};

fn txn(id: &str, category_id: Option<&str>) -> Transaction {
    Transaction {
        id: Some(id.into()),
        amount: dec!(42.50),
        description: "Groceries".into(),
        date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        category_id: category_id.map(str::to_string),
    }
}

fn filled_transaction_draft() -> TransactionDraft {
    TransactionDraft {
        amount: "12.5".into(),
        description: "Lunch".into(),
        date: "2024-05-02".into(),
        category: "food".into(),
        category_id: None,
    }
}

// ── Category form ─────────────────────────────────────────────

#[test]
fn test_edit_target_populates_fields_and_patches() {
    let (ctx, fake, _dir) = test_support::signed_in();
    fake.respond(Method::Patch, "/category/c1", 200, json!({}));

    let mut form: ResourceForm<Category> = ResourceForm::new();
    let target = category("c1", "Food", "Bills");
    assert!(form.begin_edit(&target, ctx.categories()));

    assert_eq!(form.mode(), &FormMode::Edit("c1".into()));
    assert_eq!(form.draft().label, "Food");
    assert_eq!(form.draft().icon, "Bills");

    let outcome = form.submit(&ctx);
    assert_eq!(outcome, Submission::Updated("c1".into()));

    let req = fake.last_request().unwrap();
    assert_eq!(req.method, Method::Patch);
    assert_eq!(req.path, "/category/c1");
    assert_eq!(req.bearer.as_deref(), Some("tok"));
    assert_eq!(req.body.unwrap(), json!({"label": "Food", "icon": "Bills"}));
    assert!(fake
        .requests()
        .iter()
        .all(|r| r.method != Method::Post));
}

#[test]
fn test_create_posts_and_resets() {
    let (ctx, fake, _dir) = test_support::signed_in();
    fake.respond(Method::Post, "/category", 201, json!({}));

    let mut form: ResourceForm<Category> = ResourceForm::new();
    form.draft_mut().label = "Rent".into();
    form.draft_mut().icon = "bills".into();

    assert_eq!(form.submit(&ctx), Submission::Created);
    assert_eq!(form.mode(), &FormMode::Create);
    assert_eq!(form.draft(), &CategoryDraft::default());
    assert!(form.error().is_none());

    let req = fake.last_request().unwrap();
    assert_eq!(req.path, "/category");
    // Icon normalized to its canonical label
    assert_eq!(req.body.unwrap()["icon"], "Bills");
}

#[test]
fn test_failed_update_keeps_form() {
    let (ctx, fake, _dir) = test_support::signed_in();
    fake.respond(Method::Patch, "/category/c1", 500, json!({"message": "db down"}));

    let mut form: ResourceForm<Category> = ResourceForm::new();
    form.begin_edit(&category("c1", "Food", "Bills"), ctx.categories());
    form.draft_mut().label = "Dining".into();

    assert_eq!(form.submit(&ctx), Submission::Failed);
    assert!(form.is_editing());
    assert_eq!(form.draft().label, "Dining");
    assert!(form.error().unwrap().contains("db down"));
}

#[test]
fn test_invalid_draft_sends_nothing() {
    let (ctx, fake, _dir) = test_support::signed_in();
    let mut form: ResourceForm<Category> = ResourceForm::new();
    form.draft_mut().label = "Food".into();
    form.draft_mut().icon = "Rocket".into();

    assert_eq!(form.submit(&ctx), Submission::Invalid);
    assert_eq!(fake.request_count(), 0);
    assert!(form.error().unwrap().contains("Icon must be one of"));

    form.draft_mut().icon = "Car".into();
    form.draft_mut().label = "   ".into();
    assert_eq!(form.submit(&ctx), Submission::Invalid);
    assert_eq!(fake.request_count(), 0);
}

#[test]
fn test_cancel_discards_edit() {
    let (ctx, _fake, _dir) = test_support::signed_in();
    let mut form: ResourceForm<Category> = ResourceForm::new();
    form.begin_edit(&category("c1", "Food", "Bills"), ctx.categories());
    form.draft_mut().label = "changed".into();

    form.cancel();
    assert_eq!(form.mode(), &FormMode::Create);
    assert!(form.draft().label.is_empty());
}

#[test]
fn test_begin_edit_without_id_is_ignored() {
    let mut form: ResourceForm<Category> = ResourceForm::new();
    let unsaved = Category::new("Temp".into(), crate::models::CategoryIcon::Car);
    assert!(!form.begin_edit(&unsaved, &[]));
    assert!(!form.is_editing());
}

#[test]
fn test_submit_when_signed_out() {
    let (ctx, fake, _dir) = test_support::context();
    let mut form: ResourceForm<Category> = ResourceForm::new();
    form.draft_mut().label = "Food".into();
    form.draft_mut().icon = "Car".into();

    assert_eq!(form.submit(&ctx), Submission::Failed);
    assert_eq!(fake.request_count(), 0);
    assert!(form.error().unwrap().contains("not signed in"));
}

#[test]
fn test_cycle_icon() {
    let mut draft = CategoryDraft::default();
    draft.cycle_icon();
    assert_eq!(draft.icon, "Car");
    draft.cycle_icon();
    assert_eq!(draft.icon, "Shopping");
    draft.icon = "Growth".into();
    draft.cycle_icon();
    assert_eq!(draft.icon, "Car");
}

// ── Transaction form ──────────────────────────────────────────

#[test]
fn test_transaction_draft_defaults() {
    let draft = TransactionDraft::default();
    assert_eq!(draft.amount, "0");
    assert!(draft.description.is_empty());
    assert_eq!(draft.date.len(), 10);
    assert!(draft.category.is_empty());
}

#[test]
fn test_transaction_create_payload() {
    let (ctx, fake, _dir) = test_support::signed_in();
    fake.respond(Method::Post, "/transaction", 201, json!({}));

    let mut form: ResourceForm<Transaction> = ResourceForm::new();
    *form.draft_mut() = filled_transaction_draft();

    assert_eq!(form.submit(&ctx), Submission::Created);
    let body = fake.last_request().unwrap().body.unwrap();
    assert_eq!(body["amount"], json!(12.5));
    assert_eq!(body["description"], "Lunch");
    assert_eq!(body["category_id"], "c1");
    assert_eq!(body["date"], "2024-05-02T00:00:00Z");
}

#[test]
fn test_transaction_edit_seeds_draft() {
    let (ctx, _fake, _dir) = test_support::signed_in();
    let mut form: ResourceForm<Transaction> = ResourceForm::new();
    form.begin_edit(&txn("t1", Some("c2")), ctx.categories());

    let draft = form.draft();
    assert_eq!(draft.amount, "42.5");
    assert_eq!(draft.description, "Groceries");
    assert_eq!(draft.date, "2024-01-15");
    assert_eq!(draft.category, "Travel");
}

#[test]
fn test_transaction_edit_with_dangling_category_keeps_id() {
    let (ctx, _fake, _dir) = test_support::signed_in();
    let mut form: ResourceForm<Transaction> = ResourceForm::new();
    form.begin_edit(&txn("t1", Some("gone")), ctx.categories());
    assert_eq!(form.draft().category, "gone");

    // Still unresolvable, so the submit is refused locally
    assert_eq!(form.submit(&ctx), Submission::Invalid);
    assert!(form.is_editing());
}

#[test]
fn test_transaction_update_is_patch() {
    let (ctx, fake, _dir) = test_support::signed_in();
    fake.respond(Method::Patch, "/transaction/t1", 200, json!({}));

    let mut form: ResourceForm<Transaction> = ResourceForm::new();
    form.begin_edit(&txn("t1", Some("c1")), ctx.categories());
    assert_eq!(form.submit(&ctx), Submission::Updated("t1".into()));

    let req = fake.last_request().unwrap();
    assert_eq!(req.method, Method::Patch);
    assert_eq!(req.path, "/transaction/t1");
    assert!(!form.is_editing());
}

#[test]
fn test_transaction_validation_errors() {
    let categories = test_support::user().categories;
    let base = filled_transaction_draft();

    let cases = [
        (TransactionDraft { amount: "abc".into(), ..base.clone() }, "Invalid amount"),
        (TransactionDraft { amount: "0".into(), ..base.clone() }, "greater than zero"),
        (TransactionDraft { description: " ".into(), ..base.clone() }, "Description"),
        (TransactionDraft { date: "02/05/2024".into(), ..base.clone() }, "Invalid date"),
        (TransactionDraft { category: String::new(), ..base.clone() }, "Category is required"),
        (TransactionDraft { category: "Nope".into(), ..base.clone() }, "Unknown category"),
    ];
    for (draft, expected) in cases {
        let err = Transaction::validate(&draft, &categories).unwrap_err();
        assert!(err.contains(expected), "{err} should mention {expected}");
    }
}

#[test]
fn test_unchanged_edit_keeps_category_with_shared_label() {
    let (mut ctx, fake, _dir) = test_support::signed_in();
    let mut user = test_support::user();
    user.categories.push(category("c3", "Food", "Car"));
    ctx.refresh_user(user);
    fake.respond(Method::Patch, "/transaction/t1", 200, json!({}));

    let mut form: ResourceForm<Transaction> = ResourceForm::new();
    form.begin_edit(&txn("t1", Some("c3")), ctx.categories());
    assert_eq!(form.draft().category, "Food");

    assert_eq!(form.submit(&ctx), Submission::Updated("t1".into()));
    let body = fake.last_request().unwrap().body.unwrap();
    assert_eq!(body["category_id"], "c3");
}

#[test]
fn test_shared_label_is_refused_when_typed() {
    let mut categories = test_support::user().categories;
    categories.push(category("c3", "Food", "Car"));

    let err = Transaction::validate(&filled_transaction_draft(), &categories).unwrap_err();
    assert!(err.contains("More than one category"), "{err}");

    let by_id = TransactionDraft {
        category: "c3".into(),
        ..filled_transaction_draft()
    };
    assert_eq!(Transaction::validate(&by_id, &categories).unwrap().category_id, "c3");
}

#[test]
fn test_retyped_category_overrides_seeded_id() {
    let categories = test_support::user().categories;
    let draft = TransactionDraft {
        category: "Travel".into(),
        category_id: Some("c1".into()),
        ..filled_transaction_draft()
    };
    let payload = Transaction::validate(&draft, &categories).unwrap();
    assert_eq!(payload.category_id, "c2");
}

#[test]
fn test_transaction_category_by_id() {
    let categories = test_support::user().categories;
    let draft = TransactionDraft {
        category: "c2".into(),
        ..filled_transaction_draft()
    };
    let payload = Transaction::validate(&draft, &categories).unwrap();
    assert_eq!(payload.category_id, "c2");
}

// ── Row actions ───────────────────────────────────────────────

#[test]
fn test_row_actions_disabled_while_editing() {
    let mut form: ResourceForm<Transaction> = ResourceForm::new();
    assert!(row_actions_enabled(&form));
    form.begin_edit(&txn("t1", Some("c1")), &[]);
    assert!(!row_actions_enabled(&form));
    form.cancel();
    assert!(row_actions_enabled(&form));
}

#[test]
fn test_delete_prompt() {
    assert_eq!(
        delete_prompt::<Category>(),
        "Do you really want to delete this category?"
    );
    assert_eq!(
        delete_prompt::<Transaction>(),
        "Do you really want to delete this transaction?"
    );
}

#[test]
fn test_delete_row_success() {
    let (ctx, fake, _dir) = test_support::signed_in();
    fake.respond(Method::Delete, "/transaction/t1", 200, json!({}));
    delete_row::<Transaction>(&ctx, "t1").unwrap();
    let req = fake.last_request().unwrap();
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.bearer.as_deref(), Some("tok"));
}

#[test]
fn test_delete_unknown_row_is_a_plain_error() {
    let (ctx, _fake, _dir) = test_support::signed_in();
    // Unscripted route answers 404
    let err = delete_row::<Category>(&ctx, "missing").unwrap_err();
    assert_eq!(err.status(), Some(404));
    // Collection untouched
    assert_eq!(ctx.categories().len(), 2);
}

#[test]
fn test_category_icon_lookup() {
    let user = test_support::user();
    assert_eq!(category_icon(None, Some("c1")), "⌛");
    assert_eq!(category_icon(Some(&user), Some("c1")), "💵");
    assert_eq!(category_icon(Some(&user), Some("deleted")), "❓");
    assert_eq!(category_icon(Some(&user), None), "❓");
}

// ── Auth forms ────────────────────────────────────────────────

fn login_draft() -> LoginDraft {
    LoginDraft {
        email: "ada@example.com".into(),
        password: "pw".into(),
    }
}

#[test]
fn test_login_success_persists_token() {
    let (mut ctx, fake, _dir) = test_support::context();
    fake.respond(
        Method::Post,
        "/auth/login",
        200,
        json!({"token": "fresh", "user": test_support::user_json()}),
    );

    login(&mut ctx, &login_draft()).unwrap();
    assert!(ctx.session().is_authenticated());
    assert_eq!(ctx.session().token(), Some("fresh"));
    assert_eq!(ctx.store().token().as_deref(), Some("fresh"));
    assert_eq!(ctx.categories().len(), 2);
}

#[test]
fn test_login_rejected_leaves_session() {
    let (mut ctx, fake, _dir) = test_support::context();
    fake.respond(Method::Post, "/auth/login", 401, json!({}));

    let err = login(&mut ctx, &login_draft()).unwrap_err();
    assert!(matches!(err, AuthFailure::WrongCredentials));
    assert_eq!(err.to_string(), "Wrong email or password!");
    assert!(!ctx.session().is_authenticated());
    assert!(!ctx.store().has_token());
}

#[test]
fn test_login_unreachable() {
    let (mut ctx, fake, _dir) = test_support::context();
    fake.unreachable(Method::Post, "/auth/login");
    let err = login(&mut ctx, &login_draft()).unwrap_err();
    assert!(matches!(err, AuthFailure::Api(_)));
}

#[test]
fn test_login_validation() {
    let (mut ctx, fake, _dir) = test_support::context();
    let draft = LoginDraft {
        email: "not-an-email".into(),
        password: "pw".into(),
    };
    assert!(matches!(login(&mut ctx, &draft), Err(AuthFailure::Invalid(_))));
    let draft = LoginDraft {
        password: String::new(),
        ..login_draft()
    };
    assert!(matches!(login(&mut ctx, &draft), Err(AuthFailure::Invalid(_))));
    assert_eq!(fake.request_count(), 0);
}

fn register_draft() -> RegisterDraft {
    RegisterDraft {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        password: "pw".into(),
    }
}

#[test]
fn test_register_success_does_not_sign_in() {
    let (ctx, fake, _dir) = test_support::context();
    fake.respond(Method::Post, "/auth/register", 201, json!({}));
    register(&ctx, &register_draft()).unwrap();
    assert!(!ctx.session().is_authenticated());
    assert!(fake.last_request().unwrap().bearer.is_none());
}

#[test]
fn test_register_duplicate_email() {
    let (ctx, fake, _dir) = test_support::context();
    fake.respond(Method::Post, "/auth/register", 409, json!({}));
    let err = register(&ctx, &register_draft()).unwrap_err();
    assert_eq!(err.to_string(), "Email address already exists!");
}

#[test]
fn test_register_requires_names() {
    let (ctx, fake, _dir) = test_support::context();
    let draft = RegisterDraft {
        last_name: String::new(),
        ..register_draft()
    };
    assert!(matches!(register(&ctx, &draft), Err(AuthFailure::Invalid(_))));
    assert_eq!(fake.request_count(), 0);
}

#[test]
fn test_log_out_clears_token_and_session() {
    let (mut ctx, _fake, _dir) = test_support::signed_in();
    log_out(&mut ctx);
    assert!(!ctx.session().is_authenticated());
    assert!(!ctx.store().has_token());
    assert!(!ctx.has_credentials());
}

#[test]
fn test_secret_fields() {
    assert!(LoginDraft::is_secret(1));
    assert!(!LoginDraft::is_secret(0));
    assert!(RegisterDraft::is_secret(3));
    assert!(!TransactionDraft::is_secret(0));
    assert_eq!(RegisterDraft::labels().len(), 4);
}
