//! User record fields and their validation rules

use regex_lite::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

use crate::error::HandlerError;

/// A field of the user payload that an operation can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    FirstName,
    LastName,
    City,
    Age,
}

impl Field {
    /// Key in the JSON request body
    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::City => "city",
            Field::Age => "age",
        }
    }

    /// Column in the `users` table
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::City => "city",
            Field::Age => "age",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]+$").expect("name pattern is valid"))
}

/// The validated fields of one request. Only the fields the operation
/// required are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
}

impl UserRecord {
    /// Validate `fields`, in order, out of a parsed request body.
    ///
    /// The first failing field decides the error.
    pub fn from_json(body: &Map<String, Value>, fields: &[Field]) -> Result<Self, HandlerError> {
        let mut record = UserRecord::default();

        for &field in fields {
            let value = match body.get(field.key()) {
                None | Some(Value::Null) => return Err(HandlerError::MissingField(field)),
                Some(value) => value,
            };

            match field {
                Field::Id => record.id = Some(validate_id(value)?),
                Field::FirstName => record.first_name = Some(validate_name(field, value)?),
                Field::LastName => record.last_name = Some(validate_name(field, value)?),
                Field::City => record.city = Some(validate_city(value)?),
                Field::Age => record.age = Some(validate_age(value)?),
            }
        }

        Ok(record)
    }

    /// Value of `field` as a statement parameter, `Null` when not populated
    pub fn param(&self, field: Field) -> Value {
        match field {
            Field::Id => self.id.map(Value::from),
            Field::FirstName => self.first_name.clone().map(Value::from),
            Field::LastName => self.last_name.clone().map(Value::from),
            Field::City => self.city.clone().map(Value::from),
            Field::Age => self.age.map(Value::from),
        }
        .unwrap_or(Value::Null)
    }
}

/// Names are required, non-empty, and ASCII letters only.
pub fn validate_name(field: Field, value: &Value) -> Result<String, HandlerError> {
    let name = value.as_str().ok_or(HandlerError::InvalidName(field))?;
    if name.is_empty() {
        return Err(HandlerError::MissingField(field));
    }
    if !name_pattern().is_match(name) {
        return Err(HandlerError::InvalidName(field));
    }
    Ok(name.to_string())
}

pub fn validate_city(value: &Value) -> Result<String, HandlerError> {
    let city = value.as_str().ok_or(HandlerError::InvalidCity)?;
    if city.trim().is_empty() {
        return Err(HandlerError::MissingField(Field::City));
    }
    Ok(city.to_string())
}

pub fn validate_age(value: &Value) -> Result<i64, HandlerError> {
    to_integer(value).ok_or(HandlerError::InvalidAge)
}

pub fn validate_id(value: &Value) -> Result<i64, HandlerError> {
    match to_integer(value) {
        Some(id) if id > 0 => Ok(id),
        _ => Err(HandlerError::InvalidId),
    }
}

/// Integers, integral floats, and strings holding an integer all convert.
/// Strings are trimmed first and may carry a leading `+` or `-`.
fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
