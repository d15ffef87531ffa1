use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::ValidationErrors;

use crate::utils::errors::ServiceError;

/// Field name to messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the outcome of a `validator` run.
    pub fn from_result(result: Result<(), ValidationErrors>) -> Self {
        match result {
            Ok(()) => Self::new(),
            Err(errors) => errors.into(),
        }
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Adds the messages of `other` for fields that have none yet, so a
    /// type error is not followed by a "required" for the same field.
    pub fn merge_unreported(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid.", field.replace('_', " ")),
                };
                fields.add(field.clone(), message);
            }
        }
        fields
    }
}

/// Request body decoded into named fields, before any typing.
pub type RawFields = Map<String, Value>;

fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Reads an optional integer. Numeric strings are accepted (form bodies carry
/// nothing else); null and blank strings count as absent.
pub fn integer_field(fields: &RawFields, field: &str, errors: &mut FieldErrors) -> Option<i64> {
    let parsed = match fields.get(field) {
        None | Some(Value::Null) => return None,
        Some(Value::String(raw)) if raw.trim().is_empty() => return None,
        Some(Value::String(raw)) => raw.trim().parse::<i64>().ok(),
        Some(Value::Number(number)) => number.as_i64(),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.add(field, format!("The {} field must be an integer.", label(field)));
    }
    parsed
}

/// Reads an optional string; null counts as absent.
pub fn string_field(fields: &RawFields, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.add(field, format!("The {} field must be a string.", label(field)));
            None
        }
    }
}

/// Trims a string input, mapping blank values to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a route or query identifier; only strictly positive integers are ids.
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
