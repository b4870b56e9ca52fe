use serde_json::{json, Value};
use uuid::Uuid;

use crate::gateway::{Fields, Gateway, Record, USERS};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

pub async fn list(gw: &dyn Gateway) -> anyhow::Result<Vec<Record>> {
    gw.find_all(USERS).await
}

pub async fn get(gw: &dyn Gateway, id: Uuid) -> anyhow::Result<Option<Record>> {
    gw.find_by_id(USERS, id).await
}

/// `email` must already be normalized.
pub async fn find_by_email(gw: &dyn Gateway, email: &str) -> anyhow::Result<Option<Record>> {
    gw.find_by_field(USERS, "email", &Value::String(email.to_string()))
        .await
}

pub async fn create(
    gw: &dyn Gateway,
    name: &str,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<Record> {
    gw.insert(
        USERS,
        fields(json!({ "name": name, "email": email, "password": password_hash })),
    )
    .await
}

pub async fn update(gw: &dyn Gateway, id: Uuid, name: &str, email: &str) -> anyhow::Result<u64> {
    gw.update_fields(USERS, id, fields(json!({ "name": name, "email": email })))
        .await
}

pub async fn change_password(
    gw: &dyn Gateway,
    id: Uuid,
    password_hash: &str,
) -> anyhow::Result<u64> {
    gw.update_fields(USERS, id, fields(json!({ "password": password_hash })))
        .await
}

pub async fn delete(gw: &dyn Gateway, id: Uuid) -> anyhow::Result<u64> {
    gw.delete_by_id(USERS, id).await
}
