use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Fields, Gateway, Record};

/// Process-local store, one insertion-ordered vector per collection.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    collections: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn find_all(&self, collection: &str) -> anyhow::Result<Vec<Record>> {
        let guard = self.collections.read().await;
        Ok(guard.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<Option<Record>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Option<Record>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|r| r.get(field) == Some(value)))
            .cloned())
    }

    async fn insert(&self, collection: &str, mut fields: Fields) -> anyhow::Result<Record> {
        fields.remove("id");
        let record = Record {
            id: Uuid::new_v4(),
            fields,
        };
        let mut guard = self.collections.write().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: Uuid,
        fields: Fields,
    ) -> anyhow::Result<u64> {
        let mut guard = self.collections.write().await;
        let Some(record) = guard
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|r| r.id == id))
        else {
            return Ok(0);
        };
        for (k, v) in fields {
            if k != "id" {
                record.fields.insert(k, v);
            }
        }
        Ok(1)
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<u64> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|r| r.id != id);
        Ok((before - docs.len()) as u64)
    }
}
