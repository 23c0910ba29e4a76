use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{Payload, Text, ValidationError};
use crate::database::models::NewCar;

pub const COLORS: &[&str] = &[
    "AMARELO", "AZUL", "BRANCO", "CINZA", "DOURADO", "LARANJA", "MARROM", "PRATA", "PRETO",
    "ROSA", "ROXO", "VERDE", "VERMELHO",
];

pub const MIN_YEAR_MANUFACTURE: i32 = 1960;

/// Earliest selling date the dealership accepts
pub static MIN_SELLING_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2020, 3, 20).unwrap_or(NaiveDate::MIN));

pub static MIN_SELLING_PRICE: Lazy<Decimal> = Lazy::new(|| Decimal::from(5_000));
pub static MAX_SELLING_PRICE: Lazy<Decimal> = Lazy::new(|| Decimal::from(5_000_000));

/// Validate and normalize a car payload. `today` bounds the manufacture year
/// and the selling date.
pub fn validate_car(body: &Value, today: NaiveDate) -> Result<NewCar, ValidationError> {
    let mut p = Payload::new(body)?;

    let brand = p.string("brand", Text::trimmed(1, 25));
    let model = p.string("model", Text::trimmed(1, 25));
    let color = p.one_of("color", COLORS, "Invalid color option");
    let year_manufacture = p.integer("year_manufacture", MIN_YEAR_MANUFACTURE, today.year());
    let imported = p.boolean("imported");
    let plates = p.string("plates", Text::exact(8));
    let selling_date = p.optional_date("selling_date", *MIN_SELLING_DATE, today);
    let selling_price = p.decimal("selling_price", *MIN_SELLING_PRICE, *MAX_SELLING_PRICE);

    match (brand, model, color, year_manufacture, imported, plates, selling_date, selling_price) {
        (
            Some(brand),
            Some(model),
            Some(color),
            Some(year_manufacture),
            Some(imported),
            Some(plates),
            Some(selling_date),
            Some(selling_price),
        ) => p.finish(NewCar {
            brand,
            model,
            color,
            year_manufacture,
            imported,
            plates,
            selling_date,
            selling_price,
        }),
        _ => Err(p.into_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn valid() -> Value {
        json!({
            "brand": " Volkswagen ",
            "model": "Gol",
            "color": "Prata",
            "year_manufacture": 2019,
            "imported": false,
            "plates": "ABC-1D23",
            "selling_date": "2024-02-10",
            "selling_price": "45000.50"
        })
    }

    #[test]
    fn normalizes_a_valid_car() {
        let car = validate_car(&valid(), today()).unwrap();
        assert_eq!(car.brand, "Volkswagen");
        assert_eq!(car.color, "PRATA");
        assert_eq!(car.selling_date, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(car.selling_price.to_string(), "45000.50");
    }

    #[test]
    fn selling_date_is_optional() {
        let mut body = valid();
        body["selling_date"] = Value::Null;
        assert_eq!(validate_car(&body, today()).unwrap().selling_date, None);
    }

    #[test]
    fn year_after_current_is_rejected() {
        let mut body = valid();
        body["year_manufacture"] = json!(2026);
        let err = validate_car(&body, today()).unwrap_err();
        assert!(err.has_field("year_manufacture"));
    }

    #[test]
    fn plates_must_have_eight_characters() {
        let mut body = valid();
        body["plates"] = json!("ABC123");
        let err = validate_car(&body, today()).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has_field("plates"));
    }

    #[test]
    fn selling_date_bounds() {
        let mut body = valid();
        body["selling_date"] = json!("2020-03-19");
        assert!(validate_car(&body, today()).unwrap_err().has_field("selling_date"));

        body["selling_date"] = json!("2025-06-16");
        assert!(validate_car(&body, today()).unwrap_err().has_field("selling_date"));

        body["selling_date"] = json!("2025-06-15T10:00:00Z");
        assert!(validate_car(&body, today()).is_ok());
    }

    #[test]
    fn reports_all_invalid_fields() {
        let body = json!({
            "brand": "",
            "model": "Uno",
            "color": "Magenta",
            "year_manufacture": 1959,
            "imported": "yes",
            "plates": "ABC1D23",
            "selling_price": 100
        });
        let err = validate_car(&body, today()).unwrap_err();
        for field in ["brand", "color", "year_manufacture", "imported", "plates", "selling_price"] {
            assert!(err.has_field(field), "missing violation for {}", field);
        }
        assert!(!err.has_field("model"));
        assert!(!err.has_field("selling_date"));
    }
}
