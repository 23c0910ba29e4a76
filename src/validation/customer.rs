use chrono::{Months, NaiveDate};
use serde_json::Value;

use super::{Payload, Text, ValidationError};
use crate::database::models::NewCustomer;

/// Federative units served by the dealership
pub const STATES: &[&str] = &["DF", "ES", "GO", "MS", "MG", "PR", "RJ", "SP"];

const MIN_AGE_YEARS: u32 = 18;
const MAX_AGE_YEARS: u32 = 120;

/// Validate and normalize a customer payload. `today` bounds the birth date.
pub fn validate_customer(body: &Value, today: NaiveDate) -> Result<NewCustomer, ValidationError> {
    let mut p = Payload::new(body)?;

    let name = p.string("name", Text::trimmed(5, 100));
    if matches!(&name, Some(n) if !n.contains(' ')) {
        p.violate("name", "Must include first and last name");
    }

    let ident_document = p.string("ident_document", Text::trimmed(14, 14));
    if let Some(cpf) = &ident_document {
        if !matches_mask(cpf, "###.###.###-##") {
            p.violate("ident_document", "Must follow the format 000.000.000-00");
        } else if !is_valid_cpf(cpf) {
            p.violate("ident_document", "Invalid CPF");
        }
    }

    let oldest = years_before(today, MAX_AGE_YEARS);
    let youngest = years_before(today, MIN_AGE_YEARS);
    let birth_date = p.optional_date("birth_date", oldest, youngest);

    let street_name = p.string("street_name", Text::trimmed(1, 40));
    let house_number = p.string("house_number", Text::trimmed(1, 10));
    let complements = p.optional_string("complements", Text::trimmed(0, 20));
    let district = p.string("district", Text::trimmed(1, 25));
    let municipality = p.string("municipality", Text::trimmed(1, 40));
    let state = p.one_of("state", STATES, "Invalid state option");

    let phone = p.string("phone", Text::trimmed(15, 15));
    if matches!(&phone, Some(ph) if !matches_mask(ph, "(##) %####-####")) {
        p.violate("phone", "Must follow the format (00) 00000-0000");
    }

    let email = p.email("email");

    match (
        name,
        ident_document,
        birth_date,
        street_name,
        house_number,
        complements,
        district,
        municipality,
        state,
        phone,
        email,
    ) {
        (
            Some(name),
            Some(ident_document),
            Some(birth_date),
            Some(street_name),
            Some(house_number),
            Some(complements),
            Some(district),
            Some(municipality),
            Some(state),
            Some(phone),
            Some(email),
        ) => p.finish(NewCustomer {
            name,
            ident_document,
            birth_date,
            street_name,
            house_number,
            complements,
            district,
            municipality,
            state,
            phone,
            email,
        }),
        _ => Err(p.into_error()),
    }
}

fn years_before(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// `#` is a digit, `%` is a digit or a space, anything else must match literally
fn matches_mask(value: &str, mask: &str) -> bool {
    value.chars().count() == mask.chars().count()
        && value.chars().zip(mask.chars()).all(|(c, m)| match m {
            '#' => c.is_ascii_digit(),
            '%' => c.is_ascii_digit() || c == ' ',
            _ => c == m,
        })
}

/// Checks both CPF verification digits
fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let weight_start = len as u32 + 1;
        let sum: u32 = digits
            .iter()
            .take(len)
            .enumerate()
            .map(|(i, d)| d * (weight_start - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            r => r,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}
