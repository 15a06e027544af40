//! Service layer
//!
//! Validation and orchestration for each resource. Services borrow a pooled
//! connection for the span of one call and return response structs or an
//! [`ApiError`].

pub mod ingredients;
pub mod recipes;
pub mod status;
pub mod tags;
pub mod units;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbError;
use crate::units::{resolve, UnitError};

/// Largest page a list endpoint will return
pub const MAX_PAGE_SIZE: i64 = 500;

/// Errors reported to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Map a unique-constraint violation to a 400 with `msg`; pass anything else through
    pub(crate) fn duplicate(msg: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |err| {
            if err.is_constraint_violation() {
                ApiError::bad_request(msg)
            } else {
                ApiError::Db(err)
            }
        }
    }
}

/// Pagination and search parameters shared by list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub q: Option<String>,
}

fn default_limit() -> i64 {
    100
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            q: None,
        }
    }
}

impl ListQuery {
    /// (limit, offset) clamped to sane bounds
    pub fn page(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_PAGE_SIZE), self.skip.max(0))
    }

    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Body returned by successful deletes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub details: String,
}

/// Trimmed, non-empty name or a 400
pub(crate) fn require_name(name: &str, what: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request(format!("{} name cannot be empty", what)));
    }
    Ok(name.to_string())
}

/// Resolve a unit label on a write path, returning its canonical label
pub(crate) fn canonical_unit(label: &str) -> ApiResult<&'static str> {
    resolve(label)
        .map(|unit| unit.label)
        .map_err(|_| ApiError::bad_request(format!("Invalid unit: '{}'", label)))
}

/// Reject negative or NaN amounts
pub(crate) fn require_non_negative(field: &str, value: f64) -> ApiResult<f64> {
    if value.is_nan() || value < 0.0 {
        return Err(ApiError::bad_request(format!("{} cannot be negative", field)));
    }
    Ok(value)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamps() {
        let query = ListQuery {
            skip: -5,
            limit: 10_000,
            q: None,
        };
        assert_eq!(query.page(), (MAX_PAGE_SIZE, 0));

        let query = ListQuery {
            limit: 0,
            ..ListQuery::default()
        };
        assert_eq!(query.page(), (1, 0));
        assert_eq!(ListQuery::default().page(), (100, 0));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = ListQuery {
            q: Some("  ".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_canonical_unit() {
        assert_eq!(canonical_unit(" Cup ").unwrap(), "cup");
        assert_eq!(canonical_unit("FL OZ").unwrap(), "fl oz");
        let err = canonical_unit("pinch").unwrap_err();
        assert_eq!(err.to_string(), "Invalid unit: 'pinch'");
    }

    #[test]
    fn test_require_name_and_amounts() {
        assert_eq!(require_name("  kale ", "Tag").unwrap(), "kale");
        assert!(require_name("   ", "Tag").is_err());
        assert!(require_non_negative("amount", -0.5).is_err());
        assert!(require_non_negative("amount", f64::NAN).is_err());
        assert_eq!(require_non_negative("amount", 0.0).unwrap(), 0.0);
    }
}
