use crate::domain_model::ListFilter;
use sqlx::{Postgres, QueryBuilder};

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        return db.code().as_deref() == Some("23505"); // unique_violation
    }

    false
}

/// Append the listing filters as `AND ...` clauses. `alias` is the table
/// prefix including the dot, or empty.
pub fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, alias: &str, filter: &ListFilter) {
    if let Some(pattern) = filter.search_pattern() {
        qb.push(format!(" AND ({alias}name ILIKE "))
            .push_bind(pattern.clone())
            .push(format!(" OR {alias}slug ILIKE "))
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        qb.push(format!(" AND {alias}status = "))
            .push_bind(i32::from(status));
    }
    if let Some(date) = filter.created_on {
        qb.push(format!(" AND ({alias}created_at)::date = "))
            .push_bind(date);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(format!(" AND {alias}category_id = "))
            .push_bind(category_id);
    }
}
