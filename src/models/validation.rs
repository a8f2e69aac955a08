//! Field-level request validation.
//!
//! Request shapes implement [`Validate`]; handlers receive them through
//! [`ValidatedJson`] and [`ValidatedQuery`], which turn both decoding
//! failures and constraint violations into a 422 with per-field details.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ApiError, ErrorResponse};

/// One validation problem, located by a path such as `["body", "price"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

/// Constraint checks run after a request shape has been decoded
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field errors for one request shape
#[derive(Debug, Default)]
pub struct Validator {
    source: &'static str,
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new(source: &'static str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Character count (not bytes) must lie within `min..=max`
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            let unit = if min == 1 { "character" } else { "characters" };
            self.push(field, format!("String should have at least {} {}", min, unit), "string_too_short");
        } else if len > max {
            self.push(field, format!("String should have at most {} characters", max), "string_too_long");
        }
        self
    }

    pub fn greater_than(&mut self, field: &str, value: f64, bound: f64) -> &mut Self {
        if !(value.is_finite() && value > bound) {
            self.push(field, format!("Input should be greater than {}", bound), "greater_than");
        }
        self
    }

    pub fn at_least(&mut self, field: &str, value: i64, bound: i64) -> &mut Self {
        if value < bound {
            self.push(field, format!("Input should be greater than or equal to {}", bound), "greater_than_equal");
        }
        self
    }

    pub fn at_most(&mut self, field: &str, value: i64, bound: i64) -> &mut Self {
        if value > bound {
            self.push(field, format!("Input should be less than or equal to {}", bound), "less_than_equal");
        }
        self
    }

    pub fn push(&mut self, field: &str, msg: impl Into<String>, kind: &str) {
        self.errors.push(FieldError::new(&[self.source, field], msg, kind));
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// JSON body extractor that rejects with a 422 validation error
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ErrorResponse::validation(vec![FieldError::new(&["body"], rejection.body_text(), "json_invalid")])
        })?;
        value.validate().map_err(ErrorResponse::validation)?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor that rejects with a 422 validation error
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
            ErrorResponse::validation(vec![FieldError::new(&["query"], rejection.body_text(), "query_invalid")])
        })?;
        value.validate().map_err(ErrorResponse::validation)?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters() {
        let mut v = Validator::new("body");
        v.length("name", "ééé", 1, 3);
        assert!(v.finish().is_ok());

        let mut v = Validator::new("body");
        v.length("name", "", 1, 100).length("category", &"x".repeat(51), 0, 50);
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].loc, vec!["body", "name"]);
        assert_eq!(errors[0].kind, "string_too_short");
        assert_eq!(errors[1].kind, "string_too_long");
    }

    #[test]
    fn numeric_bounds() {
        let mut v = Validator::new("query");
        v.greater_than("price", 0.0, 0.0)
            .greater_than("price", f64::NAN, 0.0)
            .at_least("page", 0, 1)
            .at_most("page_size", 101, 100);
        let kinds: Vec<String> = v.finish().unwrap_err().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["greater_than", "greater_than", "greater_than_equal", "less_than_equal"]);

        let mut v = Validator::new("query");
        v.greater_than("price", 0.01, 0.0).at_least("page", 1, 1).at_most("page_size", 100, 100);
        assert!(v.finish().is_ok());
    }
}
