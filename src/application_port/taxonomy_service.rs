use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("store error: {0}")]
    Store(String),
}

#[async_trait::async_trait]
pub trait TaxonomyService: Send + Sync {
    async fn list(
        &self,
        kind: TaxonomyKind,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<CursorPage<TaxonomyEntry>, TaxonomyError>;
    async fn get(&self, kind: TaxonomyKind, id: i64) -> Result<TaxonomyEntry, TaxonomyError>;
    async fn create(
        &self,
        kind: TaxonomyKind,
        form: TaxonomyForm,
    ) -> Result<TaxonomyEntry, TaxonomyError>;
    async fn update(
        &self,
        kind: TaxonomyKind,
        id: i64,
        form: TaxonomyForm,
    ) -> Result<TaxonomyEntry, TaxonomyError>;
    async fn delete(&self, kind: TaxonomyKind, id: i64) -> Result<(), TaxonomyError>;
    async fn toggle_status(&self, kind: TaxonomyKind, id: i64)
    -> Result<TaxonomyEntry, TaxonomyError>;

    /// Categories offered when creating or editing a subcategory.
    async fn active_categories(&self) -> Result<Vec<TaxonomyEntry>, TaxonomyError>;

    async fn list_subcategories(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<CursorPage<SubcategoryEntry>, TaxonomyError>;
    async fn get_subcategory(&self, id: i64) -> Result<SubcategoryEntry, TaxonomyError>;
    async fn create_subcategory(
        &self,
        form: SubcategoryForm,
    ) -> Result<SubcategoryEntry, TaxonomyError>;
    async fn update_subcategory(
        &self,
        id: i64,
        form: SubcategoryForm,
    ) -> Result<SubcategoryEntry, TaxonomyError>;
    async fn delete_subcategory(&self, id: i64) -> Result<(), TaxonomyError>;
    async fn toggle_subcategory_status(&self, id: i64) -> Result<SubcategoryEntry, TaxonomyError>;
}
