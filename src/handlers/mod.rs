// handlers/mod.rs - route handlers grouped by resource
//
// Every route sits behind the authorization gate; the bypass list in
// `SecurityConfig` decides which ones skip it (login and health by default).

pub mod cars;
pub mod customers;
pub mod health;
pub mod session;
pub mod users;

use chrono::{NaiveDate, Utc};

use crate::error::ApiError;

/// Record ids are SERIAL integers. Anything else cannot name an existing record.
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::not_found(format!("{} {} not found", kind, raw)))
}

/// Calendar date the date-range rules are checked against
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
