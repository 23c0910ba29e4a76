use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub ident_document: String,
    pub birth_date: Option<NaiveDate>,
    pub street_name: String,
    pub house_number: String,
    pub complements: Option<String>,
    pub district: String,
    pub municipality: String,
    pub state: String,
    pub phone: String,
    pub email: String,
}

/// A customer payload that already passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub ident_document: String,
    pub birth_date: Option<NaiveDate>,
    pub street_name: String,
    pub house_number: String,
    pub complements: Option<String>,
    pub district: String,
    pub municipality: String,
    pub state: String,
    pub phone: String,
    pub email: String,
}

impl NewCustomer {
    pub fn with_id(self, id: i32) -> Customer {
        Customer {
            id,
            name: self.name,
            ident_document: self.ident_document,
            birth_date: self.birth_date,
            street_name: self.street_name,
            house_number: self.house_number,
            complements: self.complements,
            district: self.district,
            municipality: self.municipality,
            state: self.state,
            phone: self.phone,
            email: self.email,
        }
    }
}
