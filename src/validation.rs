//! Request validation.
//!
//! DTOs declare their rules with `validator` derives. The extractors here
//! deserialize, normalize and validate a request before the handler runs, and
//! collect every failing field into a single [`AppError::Validation`].

use std::borrow::Cow;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Flattens `validator` output into one entry per failing rule, ordered by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field)),
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Canonicalizes raw input before rules are checked.
pub trait Normalize {
    fn normalize(&mut self);
}

/// Body fields that must arrive as JSON strings.
pub trait TextFields {
    const TEXT_FIELDS: &'static [&'static str];
}

/// Pulls mistyped text fields out of `body` so the remaining rules can still
/// run. `null` counts as absent.
fn take_type_errors(body: &mut Map<String, Value>, names: &[&str]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for &name in names {
        match body.get(name) {
            Some(Value::Null) => {
                body.remove(name);
            }
            Some(value) if !value.is_string() => {
                body.remove(name);
                errors.push(FieldError::new(name, &format!("{} must be a string", name)));
            }
            _ => {}
        }
    }
    errors
}

/// Type errors replace rule errors reported for the same field.
fn merge_errors(type_errors: Vec<FieldError>, rule_errors: Vec<FieldError>) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = rule_errors
        .into_iter()
        .filter(|e| !type_errors.iter().any(|t| t.field == e.field))
        .collect();
    errors.extend(type_errors);
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors
}

pub(crate) fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub(crate) fn trim_opt(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        trim(v);
    }
}

/// Query-string filters: blank means "not given".
pub(crate) fn blank_to_none(value: &mut Option<String>) {
    trim_opt(value);
    if value.as_deref() == Some("") {
        *value = None;
    }
}

pub(crate) fn one_of(
    value: &str,
    allowed: &[&str],
    code: &'static str,
    message: &'static str,
) -> std::result::Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        Err(err)
    }
}

/// JSON body that has been normalized and validated.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Normalize + TextFields,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let Value::Object(mut body) = body else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let type_errors = take_type_errors(&mut body, T::TEXT_FIELDS);
        let mut value: T = serde_json::from_value(Value::Object(body))
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        value.normalize();
        let rule_errors = match value.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        let errors = merge_errors(type_errors, rule_errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(Self(value))
    }
}

/// Query string that has been normalized and validated.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Normalize,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value.normalize();
        value.validate()?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 2, message = "Too short"))]
        name: String,
        #[validate(length(max = 3))]
        code: String,
    }

    #[test]
    fn test_field_errors_collects_all_fields() {
        let probe = Probe {
            name: "a".into(),
            code: "abcd".into(),
        };
        let errors = field_errors(&probe.validate().unwrap_err());

        assert_eq!(
            errors,
            vec![
                FieldError::new("code", "Invalid code"),
                FieldError::new("name", "Too short"),
            ]
        );
    }

    #[test]
    fn test_blank_to_none() {
        let mut value = Some("   ".to_string());
        blank_to_none(&mut value);
        assert_eq!(value, None);

        let mut value = Some(" gro ".to_string());
        blank_to_none(&mut value);
        assert_eq!(value.as_deref(), Some("gro"));
    }

    #[test]
    fn test_mistyped_fields_become_field_errors() {
        let Value::Object(mut body) = serde_json::json!({
            "title": 123,
            "description": null,
            "status": "bogus",
        }) else {
            unreachable!()
        };

        let type_errors = take_type_errors(&mut body, &["title", "description", "status"]);
        assert_eq!(type_errors, vec![FieldError::new("title", "title must be a string")]);
        assert!(!body.contains_key("title"));
        assert!(!body.contains_key("description"));
        assert_eq!(body["status"], "bogus");

        let merged = merge_errors(
            type_errors,
            vec![
                FieldError::new("title", "Title must be between 1 and 100 characters"),
                FieldError::new("status", "Invalid status"),
            ],
        );
        assert_eq!(
            merged,
            vec![
                FieldError::new("status", "Invalid status"),
                FieldError::new("title", "title must be a string"),
            ]
        );
    }

    #[test]
    fn test_one_of() {
        assert!(one_of("low", &["low", "high"], "priority", "Invalid priority").is_ok());
        let err = one_of("bogus", &["low", "high"], "priority", "Invalid priority").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Invalid priority"));
    }
}
