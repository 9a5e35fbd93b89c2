use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound for both the adults and the children count of one registration.
pub const MAX_PERSONS_PER_KIND: u32 = 20;
pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_NOTES_CHARS: usize = 500;
pub const CURRENCY_SYMBOL: &str = "€";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Name,
    HouseNumber,
    Email,
    Phone,
    PersonsAdults,
    PersonsChildren,
    AllergiesNotes,
}

impl FieldName {
    pub const ALL: [FieldName; 7] = [
        FieldName::Name,
        FieldName::HouseNumber,
        FieldName::Email,
        FieldName::Phone,
        FieldName::PersonsAdults,
        FieldName::PersonsChildren,
        FieldName::AllergiesNotes,
    ];

    /// Wire/form name, identical to the JSON key used by the register endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::HouseNumber => "houseNumber",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
            FieldName::PersonsAdults => "personsAdults",
            FieldName::PersonsChildren => "personsChildren",
            FieldName::AllergiesNotes => "allergiesNotes",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            FieldName::Name | FieldName::HouseNumber | FieldName::PersonsAdults
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldName::Name => "Naam",
            FieldName::HouseNumber => "Huisnummer",
            FieldName::Email => "E-mailadres",
            FieldName::Phone => "Telefoonnummer",
            FieldName::PersonsAdults => "Aantal volwassenen",
            FieldName::PersonsChildren => "Aantal kinderen",
            FieldName::AllergiesNotes => "Allergieën / opmerkingen",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form state exactly as typed; nothing here is validated or trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub house_number: String,
    pub email: String,
    pub phone: String,
    pub persons_adults: String,
    pub persons_children: String,
    pub allergies_notes: String,
}

impl RegistrationForm {
    pub fn value(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::HouseNumber => &self.house_number,
            FieldName::Email => &self.email,
            FieldName::Phone => &self.phone,
            FieldName::PersonsAdults => &self.persons_adults,
            FieldName::PersonsChildren => &self.persons_children,
            FieldName::AllergiesNotes => &self.allergies_notes,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::Name => &mut self.name,
            FieldName::HouseNumber => &mut self.house_number,
            FieldName::Email => &mut self.email,
            FieldName::Phone => &mut self.phone,
            FieldName::PersonsAdults => &mut self.persons_adults,
            FieldName::PersonsChildren => &mut self.persons_children,
            FieldName::AllergiesNotes => &mut self.allergies_notes,
        };
        *slot = value.into();
    }
}

/// Monetary amount in euro cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Converts a configured decimal price, rejecting negative and non-finite values.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return None;
        }
        Some(Self {
            cents: cents as u64,
        })
    }

    pub fn cents(self) -> u64 {
        self.cents
    }

    pub fn times(self, quantity: u32) -> Self {
        Self {
            cents: self.cents.saturating_mul(u64::from(quantity)),
        }
    }

    /// Plain two-decimal amount, as sent in `totalAmount`.
    pub fn amount_string(self) -> String {
        format!("{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", self.amount_string())
    }
}
