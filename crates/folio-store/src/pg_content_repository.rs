//! `PostgreSQL` implementation of the `ContentRepository` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use folio_core::content::{ContentId, ContentRecord, ContentType, ContentTypes, Field, Slug};
use folio_core::error::ContentError;
use folio_core::repository::{ContentRepository, Page};

use crate::schema::SLUG_FIELD;

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: i64,
    content_type: String,
    published_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct FieldRow {
    content_id: i64,
    name: String,
    value: serde_json::Value,
}

fn db_error(err: sqlx::Error) -> ContentError {
    ContentError::Infrastructure(format!("database error: {err}"))
}

/// Ids past `BIGINT` range can never have been stored.
fn to_db_id(id: ContentId) -> Option<i64> {
    i64::try_from(id.get()).ok()
}

/// PostgreSQL-backed content repository.
///
/// Rows carry the content type's plural slug; records are joined to the
/// configured definitions on load.
#[derive(Debug, Clone)]
pub struct PgContentRepository {
    pool: PgPool,
    content_types: Arc<ContentTypes>,
}

impl PgContentRepository {
    /// Creates a new `PgContentRepository`.
    #[must_use]
    pub fn new(pool: PgPool, content_types: Arc<ContentTypes>) -> Self {
        Self {
            pool,
            content_types,
        }
    }

    /// Stores a new record and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Infrastructure` if the slug is already taken
    /// within `content_type`, a field is not declared by the type, or the
    /// database fails.
    #[instrument(skip(self, content_type, fields), fields(content_type = %content_type.slug))]
    pub async fn insert(
        &self,
        content_type: &ContentType,
        slug: &Slug,
        fields: &[Field],
        published_at: DateTime<Utc>,
    ) -> Result<ContentId, ContentError> {
        if let Some(field) = fields.iter().find(|f| !content_type.allows_field(&f.name)) {
            return Err(ContentError::Infrastructure(format!(
                "field {} is not defined on content type {}",
                field.name, content_type.name
            )));
        }

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Serialises concurrent inserts of the same slug within a type until
        // the transaction ends.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text || '/' || $2::text))")
            .bind(&content_type.slug)
            .bind(slug.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let taken: Option<i64> = sqlx::query_scalar(
            "SELECT f.content_id FROM field f JOIN content c ON c.id = f.content_id \
             WHERE f.name = $1 AND f.value #>> '{}' = $2 AND c.content_type = $3 \
             LIMIT 1",
        )
        .bind(SLUG_FIELD)
        .bind(slug.as_str())
        .bind(&content_type.slug)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
        if taken.is_some() {
            return Err(ContentError::Infrastructure(format!(
                "slug {slug} already exists in {}",
                content_type.slug
            )));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO content (content_type, published_at) VALUES ($1, $2) RETURNING id",
        )
        .bind(&content_type.slug)
        .bind(published_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        let slug_field = Field::new(SLUG_FIELD, slug.as_str());
        for (order, field) in std::iter::once(&slug_field).chain(fields).enumerate() {
            let order = i32::try_from(order).unwrap_or(i32::MAX);
            sqlx::query(
                "INSERT INTO field (content_id, name, sort_order, value) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&field.name)
            .bind(order)
            .bind(&field.value)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        let id = u64::try_from(id)
            .ok()
            .and_then(ContentId::new)
            .ok_or_else(|| ContentError::Infrastructure(format!("invalid id {id} returned")))?;
        debug!(%id, "record inserted");
        Ok(id)
    }

    async fn load_fields(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<FieldRow>>, ContentError> {
        let rows: Vec<FieldRow> = sqlx::query_as(
            "SELECT content_id, name, value FROM field \
             WHERE content_id = ANY($1) ORDER BY content_id, sort_order, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut by_record: HashMap<i64, Vec<FieldRow>> = HashMap::new();
        for row in rows {
            by_record.entry(row.content_id).or_default().push(row);
        }
        Ok(by_record)
    }

    fn assemble(&self, row: ContentRow, fields: Vec<FieldRow>) -> Result<ContentRecord, ContentError> {
        let content_type = self.content_types.get(&row.content_type).ok_or_else(|| {
            ContentError::Infrastructure(format!(
                "record {} has unknown content type {}",
                row.id, row.content_type
            ))
        })?;
        let id = u64::try_from(row.id)
            .ok()
            .and_then(ContentId::new)
            .ok_or_else(|| ContentError::Infrastructure(format!("invalid id {}", row.id)))?;

        let mut slug = None;
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            if field.name == SLUG_FIELD {
                slug = field.value.as_str().and_then(Slug::parse);
            } else {
                values.push(Field::new(field.name, field.value));
            }
        }
        let slug = slug
            .ok_or_else(|| ContentError::Infrastructure(format!("record {id} has no valid slug")))?;

        ContentRecord::new(id, slug, Arc::clone(content_type), values, row.published_at)
    }

    async fn hydrate(&self, rows: Vec<ContentRow>) -> Result<Vec<ContentRecord>, ContentError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut fields = self.load_fields(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let record_fields = fields.remove(&row.id).unwrap_or_default();
                self.assemble(row, record_fields)
            })
            .collect()
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    #[instrument(skip(self, content_type))]
    async fn find_by_id(
        &self,
        id: ContentId,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentRecord>, ContentError> {
        let Some(db_id) = to_db_id(id) else {
            debug!(%id, "id outside database range");
            return Ok(None);
        };
        let row: Option<ContentRow> = sqlx::query_as(
            "SELECT id, content_type, published_at FROM content \
             WHERE id = $1 AND ($2::text IS NULL OR content_type = $2)",
        )
        .bind(db_id)
        .bind(content_type.map(|t| t.slug.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.pop())
    }

    #[instrument(skip(self, content_type))]
    async fn find_slug_owner(
        &self,
        slug: &Slug,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentId>, ContentError> {
        let owner: Option<i64> = sqlx::query_scalar(
            "SELECT f.content_id FROM field f JOIN content c ON c.id = f.content_id \
             WHERE f.name = $1 AND f.value #>> '{}' = $2 \
             AND ($3::text IS NULL OR c.content_type = $3) \
             ORDER BY f.content_id LIMIT 1",
        )
        .bind(SLUG_FIELD)
        .bind(slug.as_str())
        .bind(content_type.map(|t| t.slug.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(owner
            .and_then(|id| u64::try_from(id).ok())
            .and_then(ContentId::new))
    }

    #[instrument(skip(self, content_type))]
    async fn find_latest(
        &self,
        page: Page,
        content_type: Option<&ContentType>,
    ) -> Result<Vec<ContentRecord>, ContentError> {
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows: Vec<ContentRow> = sqlx::query_as(
            "SELECT id, content_type, published_at FROM content \
             WHERE ($1::text IS NULL OR content_type = $1) \
             ORDER BY published_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(content_type.map(|t| t.slug.as_str()))
        .bind(i64::from(page.size()))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.hydrate(rows).await
    }
}
