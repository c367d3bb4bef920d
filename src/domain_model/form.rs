use crate::domain_model::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 255;

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&joined.join(", "))
    }
}

/// Category / job type form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTaxonomyForm {
    pub name: String,
    pub status: Status,
}

impl TaxonomyForm {
    pub fn validate(&self) -> Result<ValidTaxonomyForm, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = validate_name(self.name.as_deref(), &mut errors);
        let status = validate_status(self.status, &mut errors);
        match (name, status) {
            (Some(name), Some(status)) => errors.into_result(ValidTaxonomyForm { name, status }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub status: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubcategoryForm {
    pub name: String,
    pub category_id: i64,
    pub status: Status,
}

impl SubcategoryForm {
    /// Shape checks only; whether the category exists is up to the caller.
    pub fn validate(&self) -> Result<ValidSubcategoryForm, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = validate_name(self.name.as_deref(), &mut errors);
        let category_id = match self.category_id {
            Some(id) if id > 0 => Some(id),
            _ => {
                errors.add("category_id", "Category field is required");
                None
            }
        };
        let status = validate_status(self.status, &mut errors);
        match (name, category_id, status) {
            (Some(name), Some(category_id), Some(status)) => {
                errors.into_result(ValidSubcategoryForm {
                    name,
                    category_id,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

fn validate_name(name: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let name = name.map(str::trim).unwrap_or_default();
    let chars = name.chars().count();
    if chars == 0 {
        errors.add("name", "Name field is required");
        None
    } else if chars < NAME_MIN_CHARS {
        errors.add("name", "Name field must be at least 2 characters");
        None
    } else if chars > NAME_MAX_CHARS {
        errors.add("name", "Name field must be at most 255 characters");
        None
    } else {
        Some(name.to_string())
    }
}

fn validate_status(status: Option<i32>, errors: &mut FieldErrors) -> Option<Status> {
    match status {
        None => {
            errors.add("status", "Status field is required");
            None
        }
        Some(raw) => match Status::try_from(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add("status", "Status field must be either 0 or 1");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_complete_form() {
        let form = TaxonomyForm {
            name: Some("  Design ".to_string()),
            status: Some(1),
        };
        assert_eq!(
            form.validate().unwrap(),
            ValidTaxonomyForm {
                name: "Design".to_string(),
                status: Status::Active,
            }
        );
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = TaxonomyForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("Name field is required"));
        assert_eq!(errors.get("status"), Some("Status field is required"));
    }

    #[test]
    fn enforces_name_length_and_status_domain() {
        let form = TaxonomyForm {
            name: Some("x".to_string()),
            status: Some(5),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some("Name field must be at least 2 characters")
        );
        assert_eq!(
            errors.get("status"),
            Some("Status field must be either 0 or 1")
        );

        let form = TaxonomyForm {
            name: Some("é".repeat(256)),
            status: Some(0),
        };
        assert_eq!(
            form.validate().unwrap_err().get("name"),
            Some("Name field must be at most 255 characters")
        );
    }

    #[test]
    fn subcategory_needs_a_category() {
        let form = SubcategoryForm {
            name: Some("Frontend".to_string()),
            category_id: Some(0),
            status: Some(1),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("category_id"), Some("Category field is required"));
        assert_eq!(errors.len(), 1);
    }
}
