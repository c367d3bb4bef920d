use crate::domain_model::Cursored;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat taxonomies that share one shape and differ only by table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TaxonomyKind {
    Category,
    JobType,
}

impl TaxonomyKind {
    pub fn table(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "categories",
            TaxonomyKind::JobType => "job_types",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::JobType => "job type",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Status {
    Inactive,
    Active,
}

impl Status {
    pub fn toggled(self) -> Status {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> i32 {
        match status {
            Status::Inactive => 0,
            Status::Active => 1,
        }
    }
}

impl TryFrom<i32> for Status {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Inactive),
            1 => Ok(Status::Active),
            other => Err(format!("invalid status {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyEntry {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cursored for TaxonomyEntry {
    fn cursor_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryEntry {
    pub id: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub name: String,
    pub slug: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cursored for SubcategoryEntry {
    fn cursor_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyDraft {
    pub name: String,
    pub slug: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryDraft {
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub status: Status,
}

/// Listing filters. `search` matches name or slug, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub created_on: Option<NaiveDate>,
    pub category_id: Option<i64>,
}

impl ListFilter {
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{}%", s))
    }

    pub fn matches(&self, name: &str, slug: &str, status: Status, created_at: DateTime<Utc>) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !name.to_lowercase().contains(&needle) && !slug.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != status) {
            return false;
        }
        if self.created_on.is_some_and(|d| d != created_at.date_naive()) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Status::Active).unwrap(), "1");
        assert_eq!(
            serde_json::from_str::<Status>("0").unwrap(),
            Status::Inactive
        );
        assert!(serde_json::from_str::<Status>("2").is_err());
    }

    #[test]
    fn filter_matches_name_or_slug_case_insensitively() {
        let filter = ListFilter {
            search: Some("WEB".to_string()),
            ..Default::default()
        };
        let now = Utc::now();
        assert!(filter.matches("Web Design", "web-design", Status::Active, now));
        assert!(filter.matches("Design", "web-x", Status::Active, now));
        assert!(!filter.matches("Design", "design", Status::Active, now));
    }

    #[test]
    fn filter_checks_status_and_date() {
        let now = Utc::now();
        let filter = ListFilter {
            status: Some(Status::Inactive),
            created_on: Some(now.date_naive()),
            ..Default::default()
        };
        assert!(filter.matches("a", "a", Status::Inactive, now));
        assert!(!filter.matches("a", "a", Status::Active, now));
        assert!(!filter.matches(
            "a",
            "a",
            Status::Inactive,
            now - chrono::Duration::days(2)
        ));
    }
}
