use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    FieldName, MAX_NAME_CHARS, MAX_NOTES_CHARS, MAX_PERSONS_PER_KIND, MIN_NAME_CHARS,
};

pub const MSG_PROCESSING: &str = "Uw aanmelding wordt verwerkt...";
pub const MSG_SUCCESS: &str =
    "Aanmelding succesvol! U wordt doorgestuurd naar de betaalpagina...";
pub const MSG_REGISTERED: &str = "Aanmelding succesvol!";
pub const MSG_SERVER_FALLBACK: &str = "Er is een fout opgetreden. Probeer het opnieuw.";
pub const MSG_NETWORK_FAILURE: &str =
    "Er is een fout opgetreden. Controleer uw internetverbinding en probeer het opnieuw.";
pub const MSG_PRICE_UNAVAILABLE: &str = "Prijs niet beschikbaar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    InvalidPhone,
    InvalidHouseNumber,
    InvalidNumber,
    CountExceeded,
    BelowMinimum,
    TooShort,
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: FieldName,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    /// The message is derived from `(field, kind)` only, so re-validating the
    /// same value always yields the same text.
    pub fn new(field: FieldName, kind: FieldErrorKind) -> Self {
        Self {
            field,
            kind,
            message: message_for(field, kind),
        }
    }
}

fn message_for(field: FieldName, kind: FieldErrorKind) -> String {
    match kind {
        FieldErrorKind::Required => "Dit veld is verplicht".to_string(),
        FieldErrorKind::InvalidEmail => "Voer een geldig e-mailadres in".to_string(),
        FieldErrorKind::InvalidPhone => "Voer een geldig telefoonnummer in".to_string(),
        FieldErrorKind::InvalidHouseNumber => {
            "Voer een geldig huisnummer in (bijv. 46 of 46a)".to_string()
        }
        FieldErrorKind::InvalidNumber => "Voer een geldig getal in".to_string(),
        FieldErrorKind::CountExceeded => match field {
            FieldName::PersonsChildren => {
                format!("Maximaal {MAX_PERSONS_PER_KIND} kinderen per aanmelding")
            }
            _ => format!("Maximaal {MAX_PERSONS_PER_KIND} volwassenen per aanmelding"),
        },
        FieldErrorKind::BelowMinimum => "Aantal volwassenen moet minimaal 1 zijn".to_string(),
        FieldErrorKind::TooShort => {
            format!("Naam moet minimaal {MIN_NAME_CHARS} karakters bevatten")
        }
        FieldErrorKind::TooLong => match field {
            FieldName::AllergiesNotes => {
                format!("Opmerkingen mogen maximaal {MAX_NOTES_CHARS} karakters bevatten")
            }
            FieldName::Email => "E-mailadres is te lang".to_string(),
            _ => format!("Naam mag maximaal {MAX_NAME_CHARS} karakters bevatten"),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The request completed but the server refused the registration.
    #[error("registration rejected by server (status {status}): {message:?}")]
    ServerRejection {
        status: u16,
        message: Option<String>,
    },
    /// The request never produced a response.
    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl SubmitError {
    /// Text shown in the status area for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::ServerRejection {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            SubmitError::ServerRejection { .. } => MSG_SERVER_FALLBACK.to_string(),
            SubmitError::NetworkFailure(_) => MSG_NETWORK_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("price per adult is not configured")]
    PricePerAdultMissing,
    #[error("price per adult must be a non-negative amount, got {0}")]
    InvalidPrice(f64),
}
