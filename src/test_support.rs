#![allow(clippy::unwrap_used)]

use serde_json::json;
use tempfile::TempDir;

use crate::api::fake::FakeTransport;
use crate::api::ApiClient;
use crate::models::{Category, User};
use crate::session::{AppContext, SessionStore};

/// A context backed by a scripted server and a throwaway session directory.
/// Keep the `TempDir` alive for the duration of the test.
pub(crate) fn context() -> (AppContext, FakeTransport, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open(dir.path()).unwrap();
    let fake = FakeTransport::new();
    let ctx = AppContext::new(store, ApiClient::new(fake.clone()));
    (ctx, fake, dir)
}

/// Same as [`context`] but already signed in as [`user`] with token `tok`.
pub(crate) fn signed_in() -> (AppContext, FakeTransport, TempDir) {
    let (mut ctx, fake, dir) = context();
    ctx.store().save_token("tok").unwrap();
    ctx.set_user(user(), "tok".into());
    (ctx, fake, dir)
}

pub(crate) fn category(id: &str, label: &str, icon: &str) -> Category {
    Category {
        id: Some(id.into()),
        label: label.into(),
        icon: icon.into(),
    }
}

pub(crate) fn user() -> User {
    User {
        id: Some("u1".into()),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        categories: vec![
            category("c1", "Food", "Bills"),
            category("c2", "Travel", "Car"),
        ],
    }
}

pub(crate) fn user_json() -> serde_json::Value {
    serde_json::to_value(user()).unwrap()
}

pub(crate) fn transaction_json(id: &str, amount: f64, category_id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "amount": amount,
        "description": format!("txn {id}"),
        "date": "2024-01-15T00:00:00Z",
        "category_id": category_id,
    })
}
