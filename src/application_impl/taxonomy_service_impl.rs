use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealTaxonomyService {
    taxonomy_repo: Arc<dyn TaxonomyRepo>,
    subcategory_repo: Arc<dyn SubcategoryRepo>,
}

impl RealTaxonomyService {
    pub fn new(
        taxonomy_repo: Arc<dyn TaxonomyRepo>,
        subcategory_repo: Arc<dyn SubcategoryRepo>,
    ) -> Self {
        Self {
            taxonomy_repo,
            subcategory_repo,
        }
    }

    fn draft(form: &TaxonomyForm) -> Result<TaxonomyDraft, TaxonomyError> {
        let valid = form.validate().map_err(TaxonomyError::Validation)?;
        Ok(TaxonomyDraft {
            slug: make_slug(&valid.name),
            name: valid.name,
            status: valid.status,
        })
    }

    /// Shape checks plus the category lookup, reported together.
    async fn subcategory_draft(
        &self,
        form: &SubcategoryForm,
    ) -> Result<SubcategoryDraft, TaxonomyError> {
        let mut errors = match form.validate() {
            Ok(valid) => {
                if self
                    .taxonomy_repo
                    .get(TaxonomyKind::Category, valid.category_id)
                    .await?
                    .is_some()
                {
                    return Ok(SubcategoryDraft {
                        category_id: valid.category_id,
                        slug: make_slug(&valid.name),
                        name: valid.name,
                        status: valid.status,
                    });
                }
                FieldErrors::default()
            }
            Err(errors) => errors,
        };
        if let Some(category_id) = form.category_id.filter(|id| *id > 0) {
            if self
                .taxonomy_repo
                .get(TaxonomyKind::Category, category_id)
                .await?
                .is_none()
            {
                errors.add("category_id", "Selected category does not exist");
            }
        }
        Err(TaxonomyError::Validation(errors))
    }

    fn not_found(kind: &str, id: i64) -> TaxonomyError {
        TaxonomyError::NotFound(format!("{kind} {id}"))
    }
}

#[async_trait::async_trait]
impl TaxonomyService for RealTaxonomyService {
    async fn list(
        &self,
        kind: TaxonomyKind,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<CursorPage<TaxonomyEntry>, TaxonomyError> {
        let items = self.taxonomy_repo.list(kind, &filter, &page).await?;
        let total = self.taxonomy_repo.count(kind, &filter).await?;
        Ok(CursorPage::new(items, &page, total))
    }

    async fn get(&self, kind: TaxonomyKind, id: i64) -> Result<TaxonomyEntry, TaxonomyError> {
        self.taxonomy_repo
            .get(kind, id)
            .await?
            .ok_or_else(|| Self::not_found(kind.label(), id))
    }

    async fn create(
        &self,
        kind: TaxonomyKind,
        form: TaxonomyForm,
    ) -> Result<TaxonomyEntry, TaxonomyError> {
        let draft = Self::draft(&form)?;
        let entry = self.taxonomy_repo.insert(kind, draft).await?;
        info!(%kind, id = entry.id, slug = %entry.slug, "created");
        Ok(entry)
    }

    async fn update(
        &self,
        kind: TaxonomyKind,
        id: i64,
        form: TaxonomyForm,
    ) -> Result<TaxonomyEntry, TaxonomyError> {
        let draft = Self::draft(&form)?;
        let entry = self
            .taxonomy_repo
            .update(kind, id, draft)
            .await?
            .ok_or_else(|| Self::not_found(kind.label(), id))?;
        info!(%kind, id, "updated");
        Ok(entry)
    }

    async fn delete(&self, kind: TaxonomyKind, id: i64) -> Result<(), TaxonomyError> {
        if !self.taxonomy_repo.delete(kind, id).await? {
            return Err(Self::not_found(kind.label(), id));
        }
        info!(%kind, id, "deleted");
        Ok(())
    }

    async fn toggle_status(
        &self,
        kind: TaxonomyKind,
        id: i64,
    ) -> Result<TaxonomyEntry, TaxonomyError> {
        self.taxonomy_repo
            .toggle_status(kind, id)
            .await?
            .ok_or_else(|| Self::not_found(kind.label(), id))
    }

    async fn active_categories(&self) -> Result<Vec<TaxonomyEntry>, TaxonomyError> {
        let filter = ListFilter {
            status: Some(Status::Active),
            ..Default::default()
        };
        let mut categories = Vec::new();
        let policy = PagePolicy::default();
        let mut page = policy.paginate(0, MAX_PAGE_SIZE as i64);
        loop {
            let batch = self
                .taxonomy_repo
                .list(TaxonomyKind::Category, &filter, &page)
                .await?;
            let Some(last) = batch.last().map(|c| c.id) else {
                break;
            };
            let full = batch.len() as u32 == page.effective_limit();
            categories.extend(batch);
            if !full {
                break;
            }
            page = policy.paginate(last, MAX_PAGE_SIZE as i64);
        }
        Ok(categories)
    }

    async fn list_subcategories(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<CursorPage<SubcategoryEntry>, TaxonomyError> {
        let items = self.subcategory_repo.list(&filter, &page).await?;
        let total = self.subcategory_repo.count(&filter).await?;
        Ok(CursorPage::new(items, &page, total))
    }

    async fn get_subcategory(&self, id: i64) -> Result<SubcategoryEntry, TaxonomyError> {
        self.subcategory_repo
            .get(id)
            .await?
            .ok_or_else(|| Self::not_found("subcategory", id))
    }

    async fn create_subcategory(
        &self,
        form: SubcategoryForm,
    ) -> Result<SubcategoryEntry, TaxonomyError> {
        let draft = self.subcategory_draft(&form).await?;
        let entry = self.subcategory_repo.insert(draft).await?;
        info!(id = entry.id, category_id = entry.category_id, "subcategory created");
        Ok(entry)
    }

    async fn update_subcategory(
        &self,
        id: i64,
        form: SubcategoryForm,
    ) -> Result<SubcategoryEntry, TaxonomyError> {
        let draft = self.subcategory_draft(&form).await?;
        let entry = self
            .subcategory_repo
            .update(id, draft)
            .await?
            .ok_or_else(|| Self::not_found("subcategory", id))?;
        info!(id, "subcategory updated");
        Ok(entry)
    }

    async fn delete_subcategory(&self, id: i64) -> Result<(), TaxonomyError> {
        if !self.subcategory_repo.delete(id).await? {
            return Err(Self::not_found("subcategory", id));
        }
        info!(id, "subcategory deleted");
        Ok(())
    }

    async fn toggle_subcategory_status(&self, id: i64) -> Result<SubcategoryEntry, TaxonomyError> {
        self.subcategory_repo
            .toggle_status(id)
            .await?
            .ok_or_else(|| Self::not_found("subcategory", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryTaxonomyRepo;

    fn service() -> RealTaxonomyService {
        let repo = Arc::new(MemoryTaxonomyRepo::new());
        RealTaxonomyService::new(repo.clone(), repo)
    }

    fn form(name: &str, status: i32) -> TaxonomyForm {
        TaxonomyForm {
            name: Some(name.to_string()),
            status: Some(status),
        }
    }

    #[tokio::test]
    async fn cursor_walks_twenty_five_rows() {
        let service = service();
        for i in 1..=25 {
            service
                .create(TaxonomyKind::Category, form(&format!("Category {i}"), 1))
                .await
                .unwrap();
        }
        let policy = PagePolicy::default();

        let first = service
            .list(TaxonomyKind::Category, ListFilter::default(), policy.paginate(0, 10))
            .await
            .unwrap();
        let ids: Vec<i64> = first.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.next_cursor, 10);
        assert_eq!(first.total, 25);

        let second = service
            .list(
                TaxonomyKind::Category,
                ListFilter::default(),
                policy.paginate(first.next_cursor, 10),
            )
            .await
            .unwrap();
        let ids: Vec<i64> = second.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<_>>());
        assert_eq!(second.next_cursor, 20);

        let beyond = service
            .list(TaxonomyKind::Category, ListFilter::default(), policy.paginate(25, 10))
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.next_cursor, 0);
    }

    #[tokio::test]
    async fn create_derives_the_slug() {
        let service = service();
        let entry = service
            .create(TaxonomyKind::JobType, form("Full Time", 1))
            .await
            .unwrap();
        assert_eq!(entry.slug, "full-time");
        assert_eq!(entry.status, Status::Active);
    }

    #[tokio::test]
    async fn invalid_forms_report_field_errors() {
        let service = service();
        let err = service
            .create(TaxonomyKind::Category, TaxonomyForm::default())
            .await
            .unwrap_err();
        let TaxonomyError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.get("name").is_some());
        assert!(errors.get("status").is_some());
    }

    #[tokio::test]
    async fn update_toggle_delete() {
        let service = service();
        let entry = service
            .create(TaxonomyKind::Category, form("Design", 1))
            .await
            .unwrap();

        let updated = service
            .update(TaxonomyKind::Category, entry.id, form("Graphic Design", 1))
            .await
            .unwrap();
        assert_eq!(updated.slug, "graphic-design");

        let toggled = service
            .toggle_status(TaxonomyKind::Category, entry.id)
            .await
            .unwrap();
        assert_eq!(toggled.status, Status::Inactive);

        service.delete(TaxonomyKind::Category, entry.id).await.unwrap();
        assert!(matches!(
            service.get(TaxonomyKind::Category, entry.id).await,
            Err(TaxonomyError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(TaxonomyKind::Category, entry.id).await,
            Err(TaxonomyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn subcategory_requires_an_existing_category() {
        let service = service();
        let err = service
            .create_subcategory(SubcategoryForm {
                name: Some("Backend".to_string()),
                category_id: Some(99),
                status: Some(1),
            })
            .await
            .unwrap_err();
        let TaxonomyError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            errors.get("category_id"),
            Some("Selected category does not exist")
        );

        let category = service
            .create(TaxonomyKind::Category, form("Engineering", 1))
            .await
            .unwrap();
        let sub = service
            .create_subcategory(SubcategoryForm {
                name: Some("Backend".to_string()),
                category_id: Some(category.id),
                status: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(sub.category_name.as_deref(), Some("Engineering"));
    }

    #[tokio::test]
    async fn subcategory_reports_shape_and_category_errors_together() {
        let service = service();
        let err = service
            .create_subcategory(SubcategoryForm {
                name: None,
                category_id: Some(5),
                status: Some(1),
            })
            .await
            .unwrap_err();
        let TaxonomyError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn active_categories_skips_inactive_ones() {
        let service = service();
        service
            .create(TaxonomyKind::Category, form("Open", 1))
            .await
            .unwrap();
        service
            .create(TaxonomyKind::Category, form("Closed", 0))
            .await
            .unwrap();

        let active = service.active_categories().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Open");
    }
}
