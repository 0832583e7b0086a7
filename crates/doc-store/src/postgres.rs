use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Document, DocumentId, Filter, Query, Result, StoreError,
    store::{DocumentStore, FieldUpdates, apply_field_updates, split_field_path},
};

/// PostgreSQL-backed document store.
///
/// Every collection lives in one `documents` table keyed by
/// `(collection, id)` with the body in a JSONB column. A `seq` column
/// preserves insertion order for queries.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url` and wraps the pool in a store.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        Ok(Document {
            id: DocumentId::new(row.try_get::<String, _>("id")?),
            data: row.try_get("data")?,
        })
    }

    /// Wraps a filter value in objects along the dotted path, producing the
    /// body used with the JSONB containment operator. Containment coincides
    /// with equality for the scalar fields the order service filters on.
    fn containment_body(field: &str, value: &Value) -> Result<Value> {
        let mut body = value.clone();
        for segment in split_field_path(field)?.iter().rev() {
            let mut wrapper = Map::new();
            wrapper.insert((*segment).to_string(), body);
            body = Value::Object(wrapper);
        }
        Ok(body)
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<DocumentId> {
        let id = DocumentId::generate();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.as_str())
            .bind(&data)
            .execute(&self.pool)
            .await?;

        tracing::debug!(collection, id = id.as_str(), "inserted document");
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &DocumentId, data: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(&data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        updates: FieldUpdates,
    ) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        // Row lock for the read-patch-write cycle. Dropping the transaction
        // on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        let row =
            sqlx::query("SELECT data FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE")
                .bind(collection)
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let Some(row) = row else {
            return Err(StoreError::not_found(collection, id.as_str()));
        };

        let mut data: Value = row.try_get("data")?;
        apply_field_updates(&mut data, &updates)?;

        sqlx::query(
            "UPDATE documents SET data = $3, updated_at = now() WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(&data)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            collection,
            id = id.as_str(),
            fields = updates.len(),
            "updated document"
        );
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>> {
        let mut sql = String::from("SELECT id, data FROM documents WHERE collection = $1");
        let mut param_count = 1;

        for filter in &query.filters {
            match filter {
                Filter::Eq { .. } => {
                    param_count += 1;
                    sql.push_str(&format!(" AND data @> ${param_count}"));
                }
                Filter::ArrayContainsAny { .. } => {
                    param_count += 1;
                    let path_param = param_count;
                    param_count += 1;
                    sql.push_str(&format!(" AND (data #> ${path_param}) ?| ${param_count}"));
                }
            }
        }

        sql.push_str(" ORDER BY seq ASC");

        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }

        let mut db_query = sqlx::query(&sql).bind(collection);
        for filter in &query.filters {
            match filter {
                Filter::Eq { field, value } => {
                    db_query = db_query.bind(Self::containment_body(field, value)?);
                }
                Filter::ArrayContainsAny { field, values } => {
                    let path: Vec<String> = split_field_path(field)?
                        .iter()
                        .map(|segment| segment.to_string())
                        .collect();
                    db_query = db_query.bind(path).bind(values.clone());
                }
            }
        }
        if let Some(limit) = query.limit {
            db_query = db_query.bind(limit as i64);
        }

        let rows = db_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_document).collect()
    }
}
