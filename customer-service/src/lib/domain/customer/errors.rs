use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Every rule a single field broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {}", .messages.join("; "))]
pub struct FieldViolation {
    pub field: &'static str,
    pub messages: Vec<String>,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            messages: vec![message.into()],
        }
    }
}

/// Violations of a whole record, keyed by field path.
///
/// Nested fields use `cards[<index>].<field>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(BTreeMap<String, Vec<String>>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Record a field violation, optionally under a path prefix such as `cards[0]`.
    pub fn record(&mut self, prefix: Option<&str>, violation: FieldViolation) {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, violation.field),
            None => violation.field.to_string(),
        };
        self.0.entry(path).or_default().extend(violation.messages);
    }

    /// Keep a parsed value or remember why it failed.
    pub fn check<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        self.check_at(None, result)
    }

    pub fn check_at<T>(
        &mut self,
        prefix: Option<&str>,
        result: Result<T, FieldViolation>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.record(prefix, violation);
                None
            }
        }
    }

    /// Parse a field that must be present.
    pub fn required<R, T>(
        &mut self,
        field: &'static str,
        raw: Option<R>,
        parse: impl FnOnce(R) -> Result<T, FieldViolation>,
    ) -> Option<T> {
        self.required_at(None, field, raw, parse)
    }

    pub fn required_at<R, T>(
        &mut self,
        prefix: Option<&str>,
        field: &'static str,
        raw: Option<R>,
        parse: impl FnOnce(R) -> Result<T, FieldViolation>,
    ) -> Option<T> {
        match raw {
            Some(raw) => self.check_at(prefix, parse(raw)),
            None => {
                self.record(prefix, FieldViolation::new(field, "field required"));
                None
            }
        }
    }

    /// Parse a field that may be absent. Absent stays `None` without a violation.
    pub fn optional<R, T>(
        &mut self,
        raw: Option<R>,
        parse: impl FnOnce(R) -> Result<T, FieldViolation>,
    ) -> Option<T> {
        raw.and_then(|raw| self.check(parse(raw)))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, messages.join("; "))?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// Top-level error for all customer-related operations
#[derive(Debug, Clone, Error)]
pub enum CustomerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] Violations),

    #[error("Customer already exists with {field}: {value}")]
    AlreadyExists { field: &'static str, value: String },

    #[error("Customer not found with customerId: {0}")]
    NotFound(String),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
