//! Collection-addressed document persistence.

mod memory;
mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

pub const PRODUCTS: &str = "products";
pub const USERS: &str = "users";

pub type Fields = Map<String, Value>;

/// One stored document. `id` is assigned on insert and never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub fields: Fields,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn i64_field(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Every record of a collection, in insertion order.
    async fn find_all(&self, collection: &str) -> anyhow::Result<Vec<Record>>;
    async fn find_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<Option<Record>>;
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Option<Record>>;
    async fn insert(&self, collection: &str, fields: Fields) -> anyhow::Result<Record>;
    /// Merges `fields` into the stored document; returns the number of documents touched.
    async fn update_fields(&self, collection: &str, id: Uuid, fields: Fields)
        -> anyhow::Result<u64>;
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<u64>;
}
