use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait TaxonomyRepo: Send + Sync {
    /// Ascending by id, at most `page.effective_limit()` rows.
    async fn list(
        &self,
        kind: TaxonomyKind,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Vec<TaxonomyEntry>, TaxonomyError>;

    /// Rows matching `filter`, ignoring any cursor.
    async fn count(&self, kind: TaxonomyKind, filter: &ListFilter) -> Result<i64, TaxonomyError>;

    async fn get(&self, kind: TaxonomyKind, id: i64)
    -> Result<Option<TaxonomyEntry>, TaxonomyError>;

    async fn insert(
        &self,
        kind: TaxonomyKind,
        draft: TaxonomyDraft,
    ) -> Result<TaxonomyEntry, TaxonomyError>;

    async fn update(
        &self,
        kind: TaxonomyKind,
        id: i64,
        draft: TaxonomyDraft,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError>;

    /// `false` when no row had that id.
    async fn delete(&self, kind: TaxonomyKind, id: i64) -> Result<bool, TaxonomyError>;

    async fn toggle_status(
        &self,
        kind: TaxonomyKind,
        id: i64,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError>;
}

#[async_trait::async_trait]
pub trait SubcategoryRepo: Send + Sync {
    async fn list(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Vec<SubcategoryEntry>, TaxonomyError>;

    async fn count(&self, filter: &ListFilter) -> Result<i64, TaxonomyError>;

    async fn get(&self, id: i64) -> Result<Option<SubcategoryEntry>, TaxonomyError>;

    async fn insert(&self, draft: SubcategoryDraft) -> Result<SubcategoryEntry, TaxonomyError>;

    async fn update(
        &self,
        id: i64,
        draft: SubcategoryDraft,
    ) -> Result<Option<SubcategoryEntry>, TaxonomyError>;

    async fn delete(&self, id: i64) -> Result<bool, TaxonomyError>;

    async fn toggle_status(&self, id: i64) -> Result<Option<SubcategoryEntry>, TaxonomyError>;
}
