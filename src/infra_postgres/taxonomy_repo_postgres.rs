use super::util::push_filter;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

const ENTRY_COLUMNS: &str = "id, name, slug, status, created_at, updated_at";

const SUBCATEGORY_SELECT: &str = r#"
SELECT s.id, s.category_id, c.name AS category_name, s.name, s.slug, s.status,
       s.created_at, s.updated_at
FROM subcategories s
LEFT JOIN categories c ON c.id = s.category_id
WHERE TRUE"#;

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    name: String,
    slug: String,
    status: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for TaxonomyEntry {
    type Error = TaxonomyError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(TaxonomyEntry {
            id: row.id,
            name: row.name,
            slug: row.slug,
            status: Status::try_from(row.status).map_err(TaxonomyError::Store)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SubcategoryRow {
    id: i64,
    category_id: i64,
    category_name: Option<String>,
    name: String,
    slug: String,
    status: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubcategoryRow> for SubcategoryEntry {
    type Error = TaxonomyError;

    fn try_from(row: SubcategoryRow) -> Result<Self, Self::Error> {
        Ok(SubcategoryEntry {
            id: row.id,
            category_id: row.category_id,
            category_name: row.category_name,
            name: row.name,
            slug: row.slug,
            status: Status::try_from(row.status).map_err(TaxonomyError::Store)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn store_err(op: &str) -> impl FnOnce(sqlx::Error) -> TaxonomyError + '_ {
    move |e| TaxonomyError::Store(format!("{op}: {e}"))
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, id_column: &str, page: &PageRequest) {
    if let Some(after) = page.lower_bound() {
        qb.push(format!(" AND {id_column} > ")).push_bind(after);
    }
    qb.push(format!(" ORDER BY {id_column} ASC LIMIT "))
        .push_bind(page.effective_limit() as i64);
}

/// Categories and job types. Table names come from `TaxonomyKind` only.
pub struct PgTaxonomyRepo {
    pool: PgPool,
}

impl PgTaxonomyRepo {
    pub fn new(pool: PgPool) -> Self {
        PgTaxonomyRepo { pool }
    }
}

#[async_trait::async_trait]
impl TaxonomyRepo for PgTaxonomyRepo {
    async fn list(
        &self,
        kind: TaxonomyKind,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Vec<TaxonomyEntry>, TaxonomyError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM {} WHERE TRUE",
            kind.table()
        ));
        push_filter(&mut qb, "", filter);
        push_page(&mut qb, "id", page);

        let rows: Vec<EntryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(store_err("list entries"))?;

        rows.into_iter().map(TaxonomyEntry::try_from).collect()
    }

    async fn count(&self, kind: TaxonomyKind, filter: &ListFilter) -> Result<i64, TaxonomyError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM {} WHERE TRUE",
            kind.table()
        ));
        push_filter(&mut qb, "", filter);

        qb.build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(store_err("count entries"))
    }

    async fn get(
        &self,
        kind: TaxonomyKind,
        id: i64,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError> {
        let row: Option<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM {} WHERE id = $1",
            kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("get entry"))?;

        row.map(TaxonomyEntry::try_from).transpose()
    }

    async fn insert(
        &self,
        kind: TaxonomyKind,
        draft: TaxonomyDraft,
    ) -> Result<TaxonomyEntry, TaxonomyError> {
        let row: EntryRow = sqlx::query_as(&format!(
            r#"
INSERT INTO {} (name, slug, status, created_at, updated_at)
VALUES ($1, $2, $3, now(), now())
RETURNING {ENTRY_COLUMNS}
"#,
            kind.table()
        ))
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(i32::from(draft.status))
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("insert entry"))?;

        row.try_into()
    }

    async fn update(
        &self,
        kind: TaxonomyKind,
        id: i64,
        draft: TaxonomyDraft,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError> {
        let row: Option<EntryRow> = sqlx::query_as(&format!(
            r#"
UPDATE {}
SET name = $1, slug = $2, status = $3, updated_at = now()
WHERE id = $4
RETURNING {ENTRY_COLUMNS}
"#,
            kind.table()
        ))
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(i32::from(draft.status))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("update entry"))?;

        row.map(TaxonomyEntry::try_from).transpose()
    }

    async fn delete(&self, kind: TaxonomyKind, id: i64) -> Result<bool, TaxonomyError> {
        let res = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete entry"))?;

        Ok(res.rows_affected() > 0)
    }

    async fn toggle_status(
        &self,
        kind: TaxonomyKind,
        id: i64,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError> {
        let row: Option<EntryRow> = sqlx::query_as(&format!(
            r#"
UPDATE {}
SET status = 1 - status, updated_at = now()
WHERE id = $1
RETURNING {ENTRY_COLUMNS}
"#,
            kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("toggle entry status"))?;

        row.map(TaxonomyEntry::try_from).transpose()
    }
}

pub struct PgSubcategoryRepo {
    pool: PgPool,
}

impl PgSubcategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        PgSubcategoryRepo { pool }
    }
}

#[async_trait::async_trait]
impl SubcategoryRepo for PgSubcategoryRepo {
    async fn list(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Vec<SubcategoryEntry>, TaxonomyError> {
        let mut qb = QueryBuilder::<Postgres>::new(SUBCATEGORY_SELECT);
        push_filter(&mut qb, "s.", filter);
        push_page(&mut qb, "s.id", page);

        let rows: Vec<SubcategoryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(store_err("list subcategories"))?;

        rows.into_iter().map(SubcategoryEntry::try_from).collect()
    }

    async fn count(&self, filter: &ListFilter) -> Result<i64, TaxonomyError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM subcategories WHERE TRUE");
        push_filter(&mut qb, "", filter);

        qb.build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(store_err("count subcategories"))
    }

    async fn get(&self, id: i64) -> Result<Option<SubcategoryEntry>, TaxonomyError> {
        let row: Option<SubcategoryRow> =
            sqlx::query_as(&format!("{SUBCATEGORY_SELECT} AND s.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_err("get subcategory"))?;

        row.map(SubcategoryEntry::try_from).transpose()
    }

    async fn insert(&self, draft: SubcategoryDraft) -> Result<SubcategoryEntry, TaxonomyError> {
        let id: i64 = sqlx::query_scalar(
            r#"
INSERT INTO subcategories (category_id, name, slug, status, created_at, updated_at)
VALUES ($1, $2, $3, $4, now(), now())
RETURNING id
"#,
        )
        .bind(draft.category_id)
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(i32::from(draft.status))
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("insert subcategory"))?;

        self.get(id)
            .await?
            .ok_or_else(|| TaxonomyError::Store(format!("subcategory {id} vanished after insert")))
    }

    async fn update(
        &self,
        id: i64,
        draft: SubcategoryDraft,
    ) -> Result<Option<SubcategoryEntry>, TaxonomyError> {
        let res = sqlx::query(
            r#"
UPDATE subcategories
SET category_id = $1, name = $2, slug = $3, status = $4, updated_at = now()
WHERE id = $5
"#,
        )
        .bind(draft.category_id)
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(i32::from(draft.status))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(store_err("update subcategory"))?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, TaxonomyError> {
        let res = sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete subcategory"))?;

        Ok(res.rows_affected() > 0)
    }

    async fn toggle_status(&self, id: i64) -> Result<Option<SubcategoryEntry>, TaxonomyError> {
        let res = sqlx::query(
            "UPDATE subcategories SET status = 1 - status, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(store_err("toggle subcategory status"))?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }
}
