//! Schema validation for incoming JSON payloads.
//!
//! Payloads are read field by field from a JSON object. Each reader coerces the
//! raw value into its normalized form (trimmed text, upper-cased options, dates,
//! decimals) and records a [`FieldViolation`] instead of stopping, so a single
//! response can report every invalid field.

pub mod car;
pub mod customer;
pub mod user;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

pub use car::validate_car;
pub use customer::validate_customer;
pub use user::{validate_user, PasswordRule, UserDraft};

/// One invalid field and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{} field(s) failed validation", .violations.len())]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// True when `field` has at least one violation
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Length bounds for a text field, counted in characters
#[derive(Debug, Clone, Copy)]
pub struct Text {
    trim: bool,
    min: usize,
    max: usize,
}

impl Text {
    pub const fn trimmed(min: usize, max: usize) -> Self {
        Self { trim: true, min, max }
    }

    pub const fn exact(len: usize) -> Self {
        Self {
            trim: false,
            min: len,
            max: len,
        }
    }

    fn check(&self, raw: &str) -> Result<String, String> {
        let text = if self.trim { raw.trim() } else { raw };
        let len = text.chars().count();

        if self.min == self.max && len != self.min {
            return Err(format!("Must be exactly {} characters long", self.min));
        }
        if len < self.min {
            return Err(format!("Must be at least {} character(s) long", self.min));
        }
        if len > self.max {
            return Err(format!("Must be at most {} characters long", self.max));
        }
        Ok(text.to_string())
    }
}

/// Field reader over a JSON object that accumulates violations
pub struct Payload<'a> {
    fields: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Payload<'a> {
    pub fn new(value: &'a Value) -> Result<Self, ValidationError> {
        match value.as_object() {
            Some(fields) => Ok(Self {
                fields,
                violations: Vec::new(),
            }),
            None => Err(ValidationError::new(vec![FieldViolation::new(
                "",
                "Expected a JSON object",
            )])),
        }
    }

    pub fn violate(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Missing and `null` both count as absent
    fn get(&self, field: &str) -> Option<&'a Value> {
        let fields: &'a Map<String, Value> = self.fields;
        fields.get(field).filter(|v| !v.is_null())
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.get(field);
        if value.is_none() {
            self.violate(field, "Required");
        }
        value
    }

    fn text_value(&mut self, field: &str, value: &Value, rule: Text) -> Option<String> {
        let Some(raw) = value.as_str() else {
            self.violate(field, "Expected a string");
            return None;
        };
        match rule.check(raw) {
            Ok(text) => Some(text),
            Err(message) => {
                self.violate(field, message);
                None
            }
        }
    }

    pub fn string(&mut self, field: &str, rule: Text) -> Option<String> {
        let value = self.required(field)?;
        self.text_value(field, value, rule)
    }

    /// Absent, `null` and blank strings all read as `Some(None)`
    pub fn optional_string(&mut self, field: &str, rule: Text) -> Option<Option<String>> {
        match self.get(field) {
            None => Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => Some(None),
            Some(value) => self.text_value(field, value, rule).map(Some),
        }
    }

    /// Upper-cases the value before checking it against `options`
    pub fn one_of(&mut self, field: &str, options: &[&str], message: &str) -> Option<String> {
        let value = self.required(field)?;
        let Some(raw) = value.as_str() else {
            self.violate(field, "Expected a string");
            return None;
        };

        let normalized = raw.trim().to_uppercase();
        if options.contains(&normalized.as_str()) {
            Some(normalized)
        } else {
            self.violate(field, message);
            None
        }
    }

    pub fn integer(&mut self, field: &str, min: i32, max: i32) -> Option<i32> {
        let value = self.required(field)?;
        let number = value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64));

        let Some(number) = number else {
            self.violate(field, "Expected an integer");
            return None;
        };
        if number < i64::from(min) {
            self.violate(field, format!("Must be at least {}", min));
            return None;
        }
        if number > i64::from(max) {
            self.violate(field, format!("Must be at most {}", max));
            return None;
        }
        i32::try_from(number).ok()
    }

    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let value = self.required(field)?;
        match value.as_bool() {
            Some(flag) => Some(flag),
            None => {
                self.violate(field, "Expected true or false");
                None
            }
        }
    }

    pub fn optional_boolean(&mut self, field: &str) -> Option<Option<bool>> {
        match self.get(field) {
            None => Some(None),
            Some(value) => match value.as_bool() {
                Some(flag) => Some(Some(flag)),
                None => {
                    self.violate(field, "Expected true or false");
                    None
                }
            },
        }
    }

    /// Accepts a JSON number or a numeric string, rounded to two decimal places
    pub fn decimal(&mut self, field: &str, min: Decimal, max: Decimal) -> Option<Decimal> {
        let value = self.required(field)?;
        let Some(number) = coerce_decimal(value) else {
            self.violate(field, "Expected a number");
            return None;
        };

        let number = number.round_dp(2);
        if number < min {
            self.violate(field, format!("Must be at least {}", min));
            return None;
        }
        if number > max {
            self.violate(field, format!("Must be at most {}", max));
            return None;
        }
        Some(number)
    }

    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (taken in UTC)
    pub fn optional_date(
        &mut self,
        field: &str,
        min: NaiveDate,
        max: NaiveDate,
    ) -> Option<Option<NaiveDate>> {
        let value = match self.get(field) {
            None => return Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Some(None),
            Some(value) => value,
        };

        let Some(date) = value.as_str().and_then(parse_date) else {
            self.violate(field, "Expected a date (YYYY-MM-DD)");
            return None;
        };
        if date < min {
            self.violate(field, format!("Must not be before {}", min.format("%Y-%m-%d")));
            return None;
        }
        if date > max {
            self.violate(field, format!("Must not be after {}", max.format("%Y-%m-%d")));
            return None;
        }
        Some(Some(date))
    }

    pub fn email(&mut self, field: &str) -> Option<String> {
        let email = self.string(field, Text::trimmed(3, 254))?;
        if is_valid_email(&email) {
            Some(email)
        } else {
            self.violate(field, "Invalid e-mail address");
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// `Ok(value)` if no violation was recorded
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.violations.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::new(self.violations))
        }
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.violations)
    }
}

fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Decimal::from(i)),
            None => n.as_f64().and_then(Decimal::from_f64),
        },
        Value::String(s) if !s.trim().is_empty() => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
