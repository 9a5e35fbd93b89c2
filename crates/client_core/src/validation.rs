//! Field-level and form-level validation of the registration form.

use std::sync::LazyLock;

use regex::Regex;
use shared::{
    domain::{
        FieldName, Money, RegistrationForm, MAX_EMAIL_CHARS, MAX_NAME_CHARS, MAX_NOTES_CHARS,
        MAX_PERSONS_PER_KIND, MIN_NAME_CHARS,
    },
    error::{FieldError, FieldErrorKind},
    protocol::RegisterRequest,
};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s()-]{10,}$").expect("phone regex"));
static HOUSE_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[a-zA-Z]?$").expect("house number regex"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

pub fn is_valid_house_number(value: &str) -> bool {
    HOUSE_NUMBER_REGEX.is_match(value)
}

/// Checks one field's raw value. Whitespace around the value is ignored.
pub fn validate_field(field: FieldName, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        if field.is_required() {
            return Err(FieldError::new(field, FieldErrorKind::Required));
        }
        return Ok(());
    }

    let fail = |kind: FieldErrorKind| -> Result<(), FieldError> {
        Err(FieldError::new(field, kind))
    };
    let chars = value.chars().count();
    match field {
        FieldName::Name if chars < MIN_NAME_CHARS => fail(FieldErrorKind::TooShort),
        FieldName::Name if chars > MAX_NAME_CHARS => fail(FieldErrorKind::TooLong),
        FieldName::AllergiesNotes if chars > MAX_NOTES_CHARS => fail(FieldErrorKind::TooLong),
        FieldName::HouseNumber if !is_valid_house_number(value) => {
            fail(FieldErrorKind::InvalidHouseNumber)
        }
        FieldName::Email if !is_valid_email(value) => fail(FieldErrorKind::InvalidEmail),
        FieldName::Email if chars > MAX_EMAIL_CHARS => fail(FieldErrorKind::TooLong),
        FieldName::Phone if !is_valid_phone(value) => fail(FieldErrorKind::InvalidPhone),
        FieldName::PersonsAdults => match parse_count(field, value)? {
            0 => fail(FieldErrorKind::BelowMinimum),
            _ => Ok(()),
        },
        FieldName::PersonsChildren => parse_count(field, value).map(|_| ()),
        _ => Ok(()),
    }
}

/// Parses a person count, enforcing `0..=MAX_PERSONS_PER_KIND`.
pub fn parse_count(field: FieldName, value: &str) -> Result<u32, FieldError> {
    let value = value.trim();
    match value.parse::<i64>() {
        Ok(n) if n < 0 => Err(FieldError::new(field, FieldErrorKind::InvalidNumber)),
        Ok(n) if n > i64::from(MAX_PERSONS_PER_KIND) => {
            Err(FieldError::new(field, FieldErrorKind::CountExceeded))
        }
        Ok(n) => Ok(n as u32),
        // Only digits but too large for i64.
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            Err(FieldError::new(field, FieldErrorKind::CountExceeded))
        }
        Err(_) => Err(FieldError::new(field, FieldErrorKind::InvalidNumber)),
    }
}

/// Aggregated outcome of validating every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: FieldName) -> Option<&FieldError> {
        self.errors.iter().find(|err| err.field == field)
    }
}

pub fn validate_form(form: &RegistrationForm) -> ValidationReport {
    let errors = FieldName::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, form.value(field)).err())
        .collect();
    ValidationReport { errors }
}

/// Validates the form and, when every field passes, serializes the trimmed
/// values into the register payload.
pub fn build_request(
    form: &RegistrationForm,
    total: Option<Money>,
) -> Result<RegisterRequest, ValidationReport> {
    let report = validate_form(form);
    if !report.is_valid() {
        return Err(report);
    }

    let count = |field: FieldName| {
        let raw = form.value(field).trim();
        if raw.is_empty() {
            return Ok(0);
        }
        parse_count(field, raw)
    };
    let (persons_adults, persons_children) =
        match (count(FieldName::PersonsAdults), count(FieldName::PersonsChildren)) {
            (Ok(adults), Ok(children)) => (adults, children),
            (adults, children) => {
                let errors = [adults.err(), children.err()].into_iter().flatten().collect();
                return Err(ValidationReport { errors });
            }
        };

    Ok(RegisterRequest {
        name: form.name.trim().to_string(),
        house_number: form.house_number.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        persons_adults,
        persons_children,
        allergies_notes: form.allergies_notes.trim().to_string(),
        total_amount: total.map(Money::amount_string),
    })
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
