use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct StoredSubcategory {
    id: i64,
    category_id: i64,
    name: String,
    slug: String,
    status: Status,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, TaxonomyEntry>,
    job_types: BTreeMap<i64, TaxonomyEntry>,
    subcategories: BTreeMap<i64, StoredSubcategory>,
    // last id handed out per table; ids are never reused after a delete
    category_serial: i64,
    job_type_serial: i64,
    subcategory_serial: i64,
}

impl Tables {
    fn flat(&mut self, kind: TaxonomyKind) -> &mut BTreeMap<i64, TaxonomyEntry> {
        match kind {
            TaxonomyKind::Category => &mut self.categories,
            TaxonomyKind::JobType => &mut self.job_types,
        }
    }

    fn next_id(&mut self, kind: TaxonomyKind) -> i64 {
        let serial = match kind {
            TaxonomyKind::Category => &mut self.category_serial,
            TaxonomyKind::JobType => &mut self.job_type_serial,
        };
        *serial += 1;
        *serial
    }

    fn next_subcategory_id(&mut self) -> i64 {
        self.subcategory_serial += 1;
        self.subcategory_serial
    }

    fn resolve(&self, stored: &StoredSubcategory) -> SubcategoryEntry {
        SubcategoryEntry {
            id: stored.id,
            category_id: stored.category_id,
            category_name: self
                .categories
                .get(&stored.category_id)
                .map(|c| c.name.clone()),
            name: stored.name.clone(),
            slug: stored.slug.clone(),
            status: stored.status,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

fn sub_matches(filter: &ListFilter, s: &StoredSubcategory) -> bool {
    filter.matches(&s.name, &s.slug, s.status, s.created_at)
        && filter.category_id.is_none_or(|id| id == s.category_id)
}

/// BTreeMap-backed taxonomy tables; ids are assigned like a serial column.
pub struct MemoryTaxonomyRepo {
    tables: Mutex<Tables>,
}

impl Default for MemoryTaxonomyRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTaxonomyRepo {
    pub fn new() -> Self {
        MemoryTaxonomyRepo {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, TaxonomyError> {
        self.tables
            .lock()
            .map_err(|e| TaxonomyError::Store(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TaxonomyRepo for MemoryTaxonomyRepo {
    async fn list(
        &self,
        kind: TaxonomyKind,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Vec<TaxonomyEntry>, TaxonomyError> {
        let mut tables = self.tables()?;
        Ok(tables
            .flat(kind)
            .values()
            .filter(|e| page.admits(e.id))
            .filter(|e| filter.matches(&e.name, &e.slug, e.status, e.created_at))
            .take(page.effective_limit() as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, kind: TaxonomyKind, filter: &ListFilter) -> Result<i64, TaxonomyError> {
        let mut tables = self.tables()?;
        Ok(tables
            .flat(kind)
            .values()
            .filter(|e| filter.matches(&e.name, &e.slug, e.status, e.created_at))
            .count() as i64)
    }

    async fn get(
        &self,
        kind: TaxonomyKind,
        id: i64,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError> {
        Ok(self.tables()?.flat(kind).get(&id).cloned())
    }

    async fn insert(
        &self,
        kind: TaxonomyKind,
        draft: TaxonomyDraft,
    ) -> Result<TaxonomyEntry, TaxonomyError> {
        let mut tables = self.tables()?;
        let id = tables.next_id(kind);
        let now = Utc::now();
        let entry = TaxonomyEntry {
            id,
            name: draft.name,
            slug: draft.slug,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        tables.flat(kind).insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        kind: TaxonomyKind,
        id: i64,
        draft: TaxonomyDraft,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError> {
        let mut tables = self.tables()?;
        Ok(tables.flat(kind).get_mut(&id).map(|entry| {
            entry.name = draft.name;
            entry.slug = draft.slug;
            entry.status = draft.status;
            entry.updated_at = Utc::now();
            entry.clone()
        }))
    }

    async fn delete(&self, kind: TaxonomyKind, id: i64) -> Result<bool, TaxonomyError> {
        Ok(self.tables()?.flat(kind).remove(&id).is_some())
    }

    async fn toggle_status(
        &self,
        kind: TaxonomyKind,
        id: i64,
    ) -> Result<Option<TaxonomyEntry>, TaxonomyError> {
        let mut tables = self.tables()?;
        Ok(tables.flat(kind).get_mut(&id).map(|entry| {
            entry.status = entry.status.toggled();
            entry.updated_at = Utc::now();
            entry.clone()
        }))
    }
}

#[async_trait::async_trait]
impl SubcategoryRepo for MemoryTaxonomyRepo {
    async fn list(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Vec<SubcategoryEntry>, TaxonomyError> {
        let tables = self.tables()?;
        Ok(tables
            .subcategories
            .values()
            .filter(|s| page.admits(s.id))
            .filter(|s| sub_matches(filter, s))
            .take(page.effective_limit() as usize)
            .map(|s| tables.resolve(s))
            .collect())
    }

    async fn count(&self, filter: &ListFilter) -> Result<i64, TaxonomyError> {
        let tables = self.tables()?;
        Ok(tables
            .subcategories
            .values()
            .filter(|s| sub_matches(filter, s))
            .count() as i64)
    }

    async fn get(&self, id: i64) -> Result<Option<SubcategoryEntry>, TaxonomyError> {
        let tables = self.tables()?;
        Ok(tables.subcategories.get(&id).map(|s| tables.resolve(s)))
    }

    async fn insert(&self, draft: SubcategoryDraft) -> Result<SubcategoryEntry, TaxonomyError> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let stored = StoredSubcategory {
            id: tables.next_subcategory_id(),
            category_id: draft.category_id,
            name: draft.name,
            slug: draft.slug,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        tables.subcategories.insert(stored.id, stored.clone());
        Ok(tables.resolve(&stored))
    }

    async fn update(
        &self,
        id: i64,
        draft: SubcategoryDraft,
    ) -> Result<Option<SubcategoryEntry>, TaxonomyError> {
        let mut tables = self.tables()?;
        let Some(stored) = tables.subcategories.get_mut(&id) else {
            return Ok(None);
        };
        stored.category_id = draft.category_id;
        stored.name = draft.name;
        stored.slug = draft.slug;
        stored.status = draft.status;
        stored.updated_at = Utc::now();
        let stored = stored.clone();
        Ok(Some(tables.resolve(&stored)))
    }

    async fn delete(&self, id: i64) -> Result<bool, TaxonomyError> {
        Ok(self.tables()?.subcategories.remove(&id).is_some())
    }

    async fn toggle_status(&self, id: i64) -> Result<Option<SubcategoryEntry>, TaxonomyError> {
        let mut tables = self.tables()?;
        let Some(stored) = tables.subcategories.get_mut(&id) else {
            return Ok(None);
        };
        stored.status = stored.status.toggled();
        stored.updated_at = Utc::now();
        let stored = stored.clone();
        Ok(Some(tables.resolve(&stored)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> TaxonomyDraft {
        TaxonomyDraft {
            name: name.to_string(),
            slug: make_slug(name),
            status: Status::Active,
        }
    }

    #[tokio::test]
    async fn kinds_are_stored_separately() {
        let repo = MemoryTaxonomyRepo::new();
        TaxonomyRepo::insert(&repo, TaxonomyKind::Category, draft("Design"))
            .await
            .unwrap();
        let job = TaxonomyRepo::insert(&repo, TaxonomyKind::JobType, draft("Remote"))
            .await
            .unwrap();

        assert_eq!(job.id, 1);
        assert_eq!(
            TaxonomyRepo::count(&repo, TaxonomyKind::Category, &ListFilter::default())
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let repo = MemoryTaxonomyRepo::new();
        TaxonomyRepo::insert(&repo, TaxonomyKind::Category, draft("One"))
            .await
            .unwrap();
        let two = TaxonomyRepo::insert(&repo, TaxonomyKind::Category, draft("Two"))
            .await
            .unwrap();
        assert!(
            TaxonomyRepo::delete(&repo, TaxonomyKind::Category, two.id)
                .await
                .unwrap()
        );

        let three = TaxonomyRepo::insert(&repo, TaxonomyKind::Category, draft("Three"))
            .await
            .unwrap();
        assert_eq!(three.id, 3);
        assert!(
            TaxonomyRepo::get(&repo, TaxonomyKind::Category, two.id)
                .await
                .unwrap()
                .is_none()
        );

        let backend = SubcategoryDraft {
            category_id: three.id,
            name: "Backend".to_string(),
            slug: "backend".to_string(),
            status: Status::Active,
        };
        let first = SubcategoryRepo::insert(&repo, backend.clone()).await.unwrap();
        assert!(SubcategoryRepo::delete(&repo, first.id).await.unwrap());
        let second = SubcategoryRepo::insert(&repo, backend).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn subcategories_carry_their_category_name() {
        let repo = MemoryTaxonomyRepo::new();
        let category = TaxonomyRepo::insert(&repo, TaxonomyKind::Category, draft("Engineering"))
            .await
            .unwrap();
        let sub = SubcategoryRepo::insert(
            &repo,
            SubcategoryDraft {
                category_id: category.id,
                name: "Backend".to_string(),
                slug: "backend".to_string(),
                status: Status::Active,
            },
        )
        .await
        .unwrap();

        assert_eq!(sub.category_name.as_deref(), Some("Engineering"));

        let filter = ListFilter {
            category_id: Some(category.id + 1),
            ..Default::default()
        };
        assert_eq!(SubcategoryRepo::count(&repo, &filter).await.unwrap(), 0);
    }
}
