use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{Fields, Gateway, Record};

/// Documents live in a single `documents` table as JSONB, partitioned by `collection`.
#[derive(Clone)]
pub struct PgGateway {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    fields: Json<Fields>,
}

impl From<DocumentRow> for Record {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            fields: row.fields.0,
        }
    }
}

impl PgGateway {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self { db })
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn find_all(&self, collection: &str) -> anyhow::Result<Vec<Record>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.db)
        .await
        .with_context(|| format!("find_all {}", collection))?;
        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<Option<Record>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("find_by_id {} {}", collection, id))?;
        Ok(row.map(Record::from))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Option<Record>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, fields
            FROM documents
            WHERE collection = $1 AND fields -> $2 = $3
            ORDER BY seq ASC
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("find_by_field {}.{}", collection, field))?;
        Ok(row.map(Record::from))
    }

    async fn insert(&self, collection: &str, mut fields: Fields) -> anyhow::Result<Record> {
        fields.remove("id");
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (collection, id, fields)
            VALUES ($1, $2, $3)
            RETURNING id, fields
            "#,
        )
        .bind(collection)
        .bind(Uuid::new_v4())
        .bind(Json(&fields))
        .fetch_one(&self.db)
        .await
        .with_context(|| format!("insert into {}", collection))?;
        Ok(row.into())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: Uuid,
        mut fields: Fields,
    ) -> anyhow::Result<u64> {
        fields.remove("id");
        let res = sqlx::query(
            r#"
            UPDATE documents
               SET fields = fields || $3
             WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&fields))
        .execute(&self.db)
        .await
        .with_context(|| format!("update {} {}", collection, id))?;
        Ok(res.rows_affected())
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM documents
             WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&self.db)
        .await
        .with_context(|| format!("delete {} {}", collection, id))?;
        Ok(res.rows_affected())
    }
}
