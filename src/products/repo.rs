use serde_json::{json, Value};
use uuid::Uuid;

use super::dto::ProductInput;
use crate::gateway::{Fields, Gateway, Record, PRODUCTS};

fn to_fields(input: &ProductInput) -> Fields {
    match json!({
        "name": input.name,
        "price": input.price,
        "category": input.category,
        "quantity": input.whole_quantity(),
    }) {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

pub async fn list(gw: &dyn Gateway) -> anyhow::Result<Vec<Record>> {
    gw.find_all(PRODUCTS).await
}

pub async fn get(gw: &dyn Gateway, id: Uuid) -> anyhow::Result<Option<Record>> {
    gw.find_by_id(PRODUCTS, id).await
}

pub async fn create(gw: &dyn Gateway, input: &ProductInput) -> anyhow::Result<Record> {
    gw.insert(PRODUCTS, to_fields(input)).await
}

pub async fn update(gw: &dyn Gateway, id: Uuid, input: &ProductInput) -> anyhow::Result<u64> {
    gw.update_fields(PRODUCTS, id, to_fields(input)).await
}

pub async fn delete(gw: &dyn Gateway, id: Uuid) -> anyhow::Result<u64> {
    gw.delete_by_id(PRODUCTS, id).await
}
