use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year_manufacture: i32,
    pub imported: bool,
    pub plates: String,
    pub selling_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
}

/// A car payload that already passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year_manufacture: i32,
    pub imported: bool,
    pub plates: String,
    pub selling_date: Option<NaiveDate>,
    pub selling_price: Decimal,
}

impl NewCar {
    pub fn with_id(self, id: i32) -> Car {
        Car {
            id,
            brand: self.brand,
            model: self.model,
            color: self.color,
            year_manufacture: self.year_manufacture,
            imported: self.imported,
            plates: self.plates,
            selling_date: self.selling_date,
            selling_price: self.selling_price,
        }
    }
}
