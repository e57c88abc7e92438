//! Field validation for the registration form.
//!
//! Every rule is a pure function of the entered value and the validator's
//! fixed notion of "today". [`FormValidator::validate_form`] runs every rule
//! for the required fields and reports all failures together; it never stops
//! at the first one.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::record::{parse_date, Gender, RegistrationForm, RegistrationType, Status};
use crate::reference::ReferenceData;
use crate::stats::age_on;

/// Letters and whitespace only, over the whole value.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("Invalid regex pattern"));

/// Exactly six ASCII digits.
static POSTAL_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("Invalid regex pattern"));

/// A form field, named as it appears in the persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `name`
    Name,
    /// `dateOfBirth`
    DateOfBirth,
    /// `gender`
    Gender,
    /// `addressLine1`
    AddressLine1,
    /// `addressLine2`
    AddressLine2,
    /// `state`
    State,
    /// `city`
    City,
    /// `postalCode`
    PostalCode,
    /// `cities`
    Cities,
    /// `areas`
    Areas,
    /// `pinCodes`
    PinCodes,
    /// `languages`
    Languages,
    /// `status`
    Status,
    /// `type`
    Type,
    /// `onboardingDate`
    OnboardingDate,
}

impl Field {
    /// Fields checked by [`FormValidator::validate_form`], in report order.
    pub const REQUIRED: [Self; 10] = [
        Self::Name,
        Self::DateOfBirth,
        Self::Gender,
        Self::AddressLine1,
        Self::State,
        Self::City,
        Self::PostalCode,
        Self::Status,
        Self::OnboardingDate,
        Self::Type,
    ];

    /// The record key for this field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
            Self::AddressLine1 => "addressLine1",
            Self::AddressLine2 => "addressLine2",
            Self::State => "state",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Cities => "cities",
            Self::Areas => "areas",
            Self::PinCodes => "pinCodes",
            Self::Languages => "languages",
            Self::Status => "status",
            Self::Type => "type",
            Self::OnboardingDate => "onboardingDate",
        }
    }

    /// Lowercase wording used in "please select" messages.
    fn label(self) -> &'static str {
        match self {
            Self::DateOfBirth => "date of birth",
            Self::AddressLine1 => "address line 1",
            Self::AddressLine2 => "address line 2",
            Self::PostalCode => "postal code",
            Self::PinCodes => "pin codes",
            Self::OnboardingDate => "onboarding date",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected. Displays as the inline message for the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Name was blank.
    #[error("Name is required")]
    NameRequired,

    /// Trimmed name is shorter than the minimum.
    #[error("Name must be at least {min} characters long")]
    NameTooShort {
        /// Minimum length in characters.
        min: usize,
    },

    /// Name contains something other than letters and spaces.
    #[error("Name can only contain letters and spaces")]
    NameInvalidCharacters,

    /// Date of birth was blank.
    #[error("Date of birth is required")]
    DateOfBirthRequired,

    /// Registrant is at or above the age limit.
    #[error("Age must be less than {max_age} years")]
    AgeLimitExceeded {
        /// Exclusive upper bound on age in years.
        max_age: u32,
    },

    /// Date of birth lies after today.
    #[error("Date of birth cannot be in the future")]
    DateOfBirthInFuture,

    /// No gender was selected.
    #[error("Please select a gender")]
    GenderRequired,

    /// First address line was blank.
    #[error("Address Line 1 is required")]
    AddressRequired,

    /// Trimmed first address line is shorter than the minimum.
    #[error("Address must be at least {min} characters long")]
    AddressTooShort {
        /// Minimum length in characters.
        min: usize,
    },

    /// A select was left on its placeholder.
    #[error("Please select a {}", .0.label())]
    SelectionRequired(Field),

    /// A select holds a value it never offered.
    #[error("'{value}' is not a valid choice for {field}")]
    InvalidChoice {
        /// The field.
        field: Field,
        /// The rejected value.
        value: String,
    },

    /// Postal code was blank.
    #[error("Postal code is required")]
    PostalCodeRequired,

    /// Postal code isn't six digits.
    #[error("Postal code must be exactly 6 digits")]
    PostalCodeFormat,

    /// Onboarding date was blank.
    #[error("Onboarding date is required")]
    OnboardingDateRequired,

    /// Onboarding date lies after today.
    #[error("Onboarding date cannot be in the future")]
    OnboardingDateInFuture,

    /// A date field couldn't be parsed as `YYYY-MM-DD`.
    #[error("Please enter a valid date")]
    InvalidDate,

    /// State isn't in the state table.
    #[error("Unknown state '{0}'")]
    UnknownState(String),

    /// City doesn't belong to the selected state.
    #[error("'{city}' is not a city of {state}")]
    CityNotInState {
        /// The city.
        city: String,
        /// The selected state.
        state: String,
    },
}

/// Every failing field of one form, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<(Field, FieldError)>,
}

impl ValidationReport {
    /// Record a failure.
    pub fn push(&mut self, field: Field, error: FieldError) {
        self.errors.push((field, error));
    }

    /// Record a failure if there is one.
    pub fn check(&mut self, field: Field, outcome: Option<FieldError>) {
        if let Some(error) = outcome {
            self.push(field, error);
        }
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First failure recorded for `field`.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| e)
    }

    /// Inline message for `field`, empty when it passed.
    #[must_use]
    pub fn message(&self, field: Field) -> String {
        self.get(field).map(ToString::to_string).unwrap_or_default()
    }

    /// All failures.
    pub fn iter(&self) -> impl Iterator<Item = &(Field, FieldError)> {
        self.errors.iter()
    }

    /// Append another report's failures.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

/// Validates registration forms as of a fixed date.
#[derive(Debug, Clone)]
pub struct FormValidator {
    config: ValidationConfig,
    today: NaiveDate,
}

impl FormValidator {
    /// Create a validator that treats `today` as the current date.
    #[must_use]
    pub fn new(config: ValidationConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    /// The date rules are evaluated against.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// `name`: required, minimum trimmed length, letters and spaces only.
    #[must_use]
    pub fn name(&self, value: &str) -> Option<FieldError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Some(FieldError::NameRequired);
        }
        if trimmed.chars().count() < self.config.min_name_length {
            return Some(FieldError::NameTooShort {
                min: self.config.min_name_length,
            });
        }
        if !NAME_PATTERN.is_match(value) {
            return Some(FieldError::NameInvalidCharacters);
        }
        None
    }

    /// `dateOfBirth`: required, under the age limit, not in the future.
    #[must_use]
    pub fn date_of_birth(&self, value: &str) -> Option<FieldError> {
        if value.trim().is_empty() {
            return Some(FieldError::DateOfBirthRequired);
        }
        let Some(dob) = parse_date(value) else {
            return Some(FieldError::InvalidDate);
        };
        if age_on(dob, self.today) >= i32::try_from(self.config.max_age_years).unwrap_or(i32::MAX)
        {
            return Some(FieldError::AgeLimitExceeded {
                max_age: self.config.max_age_years,
            });
        }
        if dob > self.today {
            return Some(FieldError::DateOfBirthInFuture);
        }
        None
    }

    /// `gender`: exactly one of the offered options.
    #[must_use]
    pub fn gender(&self, selected: Option<&str>) -> Option<FieldError> {
        match selected.map(str::parse::<Gender>) {
            Some(Ok(_)) => None,
            _ => Some(FieldError::GenderRequired),
        }
    }

    /// `addressLine1`: required, minimum trimmed length.
    #[must_use]
    pub fn address_line1(&self, value: &str) -> Option<FieldError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Some(FieldError::AddressRequired);
        }
        if trimmed.chars().count() < self.config.min_address_length {
            return Some(FieldError::AddressTooShort {
                min: self.config.min_address_length,
            });
        }
        None
    }

    /// `addressLine2`: optional, never fails.
    #[must_use]
    pub fn address_line2(&self, _value: &str) -> Option<FieldError> {
        None
    }

    /// `state`: a selection is required.
    #[must_use]
    pub fn state(&self, value: &str) -> Option<FieldError> {
        selection(Field::State, value)
    }

    /// `city`: a selection is required.
    #[must_use]
    pub fn city(&self, value: &str) -> Option<FieldError> {
        selection(Field::City, value)
    }

    /// `postalCode`: exactly six digits.
    #[must_use]
    pub fn postal_code(&self, value: &str) -> Option<FieldError> {
        if value.trim().is_empty() {
            return Some(FieldError::PostalCodeRequired);
        }
        if !POSTAL_CODE_PATTERN.is_match(value) {
            return Some(FieldError::PostalCodeFormat);
        }
        None
    }

    /// `status`: one of the offered statuses.
    #[must_use]
    pub fn status(&self, value: &str) -> Option<FieldError> {
        selection(Field::Status, value).or_else(|| {
            value.parse::<Status>().err().map(|_| FieldError::InvalidChoice {
                field: Field::Status,
                value: value.to_string(),
            })
        })
    }

    /// `type`: one of the offered registrant types.
    #[must_use]
    pub fn registration_type(&self, value: &str) -> Option<FieldError> {
        selection(Field::Type, value).or_else(|| {
            value
                .parse::<RegistrationType>()
                .err()
                .map(|_| FieldError::InvalidChoice {
                    field: Field::Type,
                    value: value.to_string(),
                })
        })
    }

    /// `onboardingDate`: required, not in the future.
    #[must_use]
    pub fn onboarding_date(&self, value: &str) -> Option<FieldError> {
        if value.trim().is_empty() {
            return Some(FieldError::OnboardingDateRequired);
        }
        match parse_date(value) {
            None => Some(FieldError::InvalidDate),
            Some(date) if date > self.today => Some(FieldError::OnboardingDateInFuture),
            Some(_) => None,
        }
    }

    /// Run the rule for one field of `form`.
    ///
    /// Multi-select fields have no standalone rule; see [`check_references`].
    #[must_use]
    pub fn validate_field(&self, field: Field, form: &RegistrationForm) -> Option<FieldError> {
        match field {
            Field::Name => self.name(&form.name),
            Field::DateOfBirth => self.date_of_birth(&form.date_of_birth),
            Field::Gender => self.gender(form.gender.as_deref()),
            Field::AddressLine1 => self.address_line1(&form.address_line1),
            Field::AddressLine2 => self.address_line2(&form.address_line2),
            Field::State => self.state(&form.state),
            Field::City => self.city(&form.city),
            Field::PostalCode => self.postal_code(&form.postal_code),
            Field::Status => self.status(&form.status),
            Field::Type => self.registration_type(&form.registration_type),
            Field::OnboardingDate => self.onboarding_date(&form.onboarding_date),
            Field::Cities | Field::Areas | Field::PinCodes | Field::Languages => None,
        }
    }

    /// Run every required-field rule and collect all failures.
    #[must_use]
    pub fn validate_form(&self, form: &RegistrationForm) -> ValidationReport {
        let mut report = ValidationReport::default();
        for field in Field::REQUIRED {
            report.check(field, self.validate_field(field, form));
        }
        debug!(failures = report.len(), "Validated registration form");
        report
    }
}

fn selection(field: Field, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::SelectionRequired(field))
    } else {
        None
    }
}

/// Check the location and multi-select values against the reference tables.
///
/// Blank `state`/`city` are left to the form rules; everything that is
/// filled in must come from the table it was offered from.
#[must_use]
pub fn check_references(form: &RegistrationForm, reference: &ReferenceData) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !form.state.is_empty() && !reference.has_state(&form.state) {
        report.push(Field::State, FieldError::UnknownState(form.state.clone()));
    }

    let cities = reference.cities(&form.state);
    if !form.city.is_empty() && reference.has_state(&form.state) && !cities.contains(&form.city.as_str())
    {
        report.push(
            Field::City,
            FieldError::CityNotInState {
                city: form.city.clone(),
                state: form.state.clone(),
            },
        );
    }

    if let Some(city) = form.cities.iter().find(|c| !cities.contains(&c.as_str())) {
        report.push(Field::Cities, invalid(Field::Cities, city));
    }

    let areas = reference.areas_for(&form.cities);
    if let Some(area) = form.areas.iter().find(|a| !areas.contains(&a.as_str())) {
        report.push(Field::Areas, invalid(Field::Areas, area));
    }

    let pins = reference.pin_codes(&form.state);
    if let Some(pin) = form.pin_codes.iter().find(|p| !pins.contains(*p)) {
        report.push(Field::PinCodes, invalid(Field::PinCodes, pin));
    }

    if let Some(lang) = form.languages.iter().find(|l| !reference.has_language(l)) {
        report.push(Field::Languages, invalid(Field::Languages, lang));
    }

    report
}

fn invalid(field: Field, value: &str) -> FieldError {
    FieldError::InvalidChoice {
        field,
        value: value.to_string(),
    }
}
