//! Core registration types for regdesk.
//!
//! This module defines the persisted registration record, the enumerated
//! fields it carries, and the string-typed candidate form the intake surface
//! collects before validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::validation::{Field, FieldError, ValidationReport};

/// Date format used for `dateOfBirth` and `onboardingDate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An enumerated field received text it doesn't recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The lowercase wire name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Registrant gender, a single-select radio group.
    Gender, "gender" {
        /// Male.
        Male => "male",
        /// Female.
        Female => "female",
        /// Other.
        Other => "other",
    }
}

string_enum! {
    /// Account status of a registrant.
    Status, "status" {
        /// Active account.
        Active => "active",
        /// Inactive account.
        Inactive => "inactive",
        /// Suspended account.
        Suspended => "suspended",
    }
}

string_enum! {
    /// Kind of registrant.
    RegistrationType, "type" {
        /// A single person.
        Individual => "individual",
        /// An agency.
        Agency => "agency",
        /// A sub-agency under an agency.
        Subagency => "subagency",
    }
}

/// A stored registration.
///
/// Field names serialize exactly as the persisted `registrationData` blob
/// expects them (`dateOfBirth`, `addressLine1`, `pinCodes`, `type`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Unique id, derived from the creation time in Unix milliseconds.
    pub id: i64,

    /// When this record was created.
    pub timestamp: DateTime<Utc>,

    /// Registrant name.
    pub name: String,

    /// Date of birth.
    pub date_of_birth: NaiveDate,

    /// Selected gender.
    pub gender: Gender,

    /// First address line.
    pub address_line1: String,

    /// Optional second address line.
    #[serde(default)]
    pub address_line2: String,

    /// State, a key of the state/city table.
    pub state: String,

    /// Primary city within `state`.
    pub city: String,

    /// Six digit postal code.
    pub postal_code: String,

    /// Additional cities within `state`.
    #[serde(default)]
    pub cities: Vec<String>,

    /// Areas within the selected `cities`.
    #[serde(default)]
    pub areas: Vec<String>,

    /// Pin codes of `state`.
    #[serde(default)]
    pub pin_codes: Vec<String>,

    /// Languages known.
    #[serde(default)]
    pub languages: Vec<String>,

    /// Account status.
    pub status: Status,

    /// Registrant kind.
    #[serde(rename = "type")]
    pub registration_type: RegistrationType,

    /// Date the registrant was onboarded.
    pub onboarding_date: NaiveDate,
}

impl Registration {
    /// Build a record from an already validated form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every field that could not be
    /// converted to its typed form. A form that passed
    /// [`validate_form`](crate::validation::FormValidator::validate_form)
    /// always converts.
    pub fn from_form(form: RegistrationForm, id: i64, timestamp: DateTime<Utc>) -> Result<Self> {
        let mut report = ValidationReport::default();

        let date_of_birth = parse_date(&form.date_of_birth);
        if date_of_birth.is_none() {
            report.push(Field::DateOfBirth, FieldError::InvalidDate);
        }
        let gender = form.gender.as_deref().and_then(|g| g.parse::<Gender>().ok());
        if gender.is_none() {
            report.push(Field::Gender, FieldError::GenderRequired);
        }
        let status = form.status.parse::<Status>().ok();
        if status.is_none() {
            report.push(Field::Status, FieldError::SelectionRequired(Field::Status));
        }
        let registration_type = form.registration_type.parse::<RegistrationType>().ok();
        if registration_type.is_none() {
            report.push(Field::Type, FieldError::SelectionRequired(Field::Type));
        }
        let onboarding_date = parse_date(&form.onboarding_date);
        if onboarding_date.is_none() {
            report.push(Field::OnboardingDate, FieldError::InvalidDate);
        }

        match (
            date_of_birth,
            gender,
            status,
            registration_type,
            onboarding_date,
        ) {
            (
                Some(date_of_birth),
                Some(gender),
                Some(status),
                Some(registration_type),
                Some(onboarding_date),
            ) => Ok(Self {
                id,
                timestamp,
                name: form.name,
                date_of_birth,
                gender,
                address_line1: form.address_line1,
                address_line2: form.address_line2,
                state: form.state,
                city: form.city,
                postal_code: form.postal_code,
                cities: form.cities,
                areas: form.areas,
                pin_codes: form.pin_codes,
                languages: form.languages,
                status,
                registration_type,
                onboarding_date,
            }),
            _ => Err(Error::Validation(report)),
        }
    }

    /// Age in whole years as of `today`.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        crate::stats::age_on(self.date_of_birth, today)
    }
}

/// The raw values collected by the intake form, before validation.
///
/// Dates and enumerations are kept as text so the validator can report on
/// exactly what was entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    /// Registrant name.
    pub name: String,
    /// Date of birth as `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// Selected gender, if any radio button is checked.
    pub gender: Option<String>,
    /// First address line.
    pub address_line1: String,
    /// Second address line.
    pub address_line2: String,
    /// Selected state.
    pub state: String,
    /// Selected city.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Checked cities.
    pub cities: Vec<String>,
    /// Checked areas.
    pub areas: Vec<String>,
    /// Checked pin codes.
    pub pin_codes: Vec<String>,
    /// Checked languages.
    pub languages: Vec<String>,
    /// Selected status.
    pub status: String,
    /// Selected registrant type.
    #[serde(rename = "type")]
    pub registration_type: String,
    /// Onboarding date as `YYYY-MM-DD`.
    pub onboarding_date: String,
}

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}
