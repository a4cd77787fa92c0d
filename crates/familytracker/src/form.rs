//! Entry forms for new members and shelters.
//!
//! A form holds raw text exactly as typed. Submitting validates presence of
//! the required fields and parses the coordinates; only a fully valid form
//! reaches the [`Roster`]. A rejected submission leaves both the roster and
//! the form fields untouched, and a successful one clears every field.

use thiserror::Error;
use tracing::debug;

use crate::config::FormsConfig;
use crate::model::{Coordinates, Member, Shelter};
use crate::roster::Roster;

/// A form input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Display name of the member or shelter.
    Name,
    /// Shelter name typed on the member form.
    Shelter,
    /// Latitude in degrees.
    Latitude,
    /// Longitude in degrees.
    Longitude,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Shelter => write!(f, "shelter"),
            Self::Latitude => write!(f, "latitude"),
            Self::Longitude => write!(f, "longitude"),
        }
    }
}

/// Reasons a form submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was left empty.
    #[error("{0} is required")]
    MissingField(Field),

    /// A coordinate field did not hold a finite number.
    #[error("{field} is not a number: '{value}'")]
    InvalidNumber {
        /// The offending field.
        field: Field,
        /// The raw input.
        value: String,
    },
}

/// Raw input for a new member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberForm {
    /// Member name.
    pub name: String,
    /// Associated shelter name, free text.
    pub shelter: String,
    /// Latitude as typed.
    pub latitude: String,
    /// Longitude as typed.
    pub longitude: String,
}

/// Raw input for a new shelter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelterForm {
    /// Shelter name.
    pub name: String,
    /// Latitude as typed.
    pub latitude: String,
    /// Longitude as typed.
    pub longitude: String,
}

impl MemberForm {
    /// Check whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.shelter.is_empty()
            && self.latitude.is_empty()
            && self.longitude.is_empty()
    }

    /// Validate the form and register the member.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if a required field is empty or a coordinate
    /// cannot be parsed; in that case nothing is changed.
    pub fn submit<'r>(
        &mut self,
        roster: &'r mut Roster,
        rules: &FormsConfig,
    ) -> Result<&'r Member, FormError> {
        let name = required(&self.name, Field::Name)?;
        let shelter = if rules.require_member_shelter {
            Some(required(&self.shelter, Field::Shelter)?)
        } else {
            optional(&self.shelter)
        };
        let latitude = required(&self.latitude, Field::Latitude)?;
        let longitude = required(&self.longitude, Field::Longitude)?;

        let position = Coordinates::new(
            parse_coordinate(latitude, Field::Latitude, rules)?,
            parse_coordinate(longitude, Field::Longitude, rules)?,
        );
        let name = name.to_string();
        let shelter = shelter.map(str::to_string);

        *self = Self::default();
        Ok(roster.add_member(name, shelter, position))
    }
}

impl ShelterForm {
    /// Check whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.latitude.is_empty() && self.longitude.is_empty()
    }

    /// Validate the form and register the shelter.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if a required field is empty or a coordinate
    /// cannot be parsed; in that case nothing is changed.
    pub fn submit<'r>(
        &mut self,
        roster: &'r mut Roster,
        rules: &FormsConfig,
    ) -> Result<&'r Shelter, FormError> {
        let name = required(&self.name, Field::Name)?;
        let latitude = required(&self.latitude, Field::Latitude)?;
        let longitude = required(&self.longitude, Field::Longitude)?;

        let position = Coordinates::new(
            parse_coordinate(latitude, Field::Latitude, rules)?,
            parse_coordinate(longitude, Field::Longitude, rules)?,
        );
        let name = name.to_string();

        *self = Self::default();
        Ok(roster.add_shelter(name, position))
    }
}

/// Trimmed value of a required field.
fn required(value: &str, field: Field) -> Result<&str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        debug!(%field, "Rejecting submission, field is empty");
        return Err(FormError::MissingField(field));
    }
    Ok(trimmed)
}

/// Trimmed value of an optional field, `None` when blank.
fn optional(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a coordinate according to the configured numeric policy.
///
/// In lenient mode unparseable input becomes `NaN` and is accepted.
fn parse_coordinate(value: &str, field: Field, rules: &FormsConfig) -> Result<f64, FormError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() || !rules.reject_non_numeric => Ok(number),
        Err(_) if !rules.reject_non_numeric => {
            debug!(%field, value, "Accepting non-numeric coordinate as NaN");
            Ok(f64::NAN)
        }
        _ => {
            debug!(%field, value, "Rejecting submission, coordinate is not a number");
            Err(FormError::InvalidNumber {
                field,
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> FormsConfig {
        FormsConfig::default()
    }

    fn lenient() -> FormsConfig {
        FormsConfig {
            reject_non_numeric: false,
            ..FormsConfig::default()
        }
    }

    fn alice_form() -> MemberForm {
        MemberForm {
            name: "Alice".to_string(),
            shelter: String::new(),
            latitude: "28.61".to_string(),
            longitude: "77.20".to_string(),
        }
    }

    #[test]
    fn test_member_submit_adds_and_resets() {
        let mut roster = Roster::new();
        let mut form = alice_form();

        let member = form.submit(&mut roster, &strict()).unwrap();
        assert_eq!(member.name, "Alice");
        assert!(member.safe);
        assert!(member.shelter.is_none());
        assert!((member.position.latitude - 28.61).abs() < f64::EPSILON);

        assert!(form.is_blank());
        assert_eq!(roster.member_count(), 1);
    }

    #[test]
    fn test_member_submit_missing_field_keeps_state() {
        for field in [Field::Name, Field::Latitude, Field::Longitude] {
            let mut roster = Roster::new();
            let mut form = alice_form();
            match field {
                Field::Name => form.name.clear(),
                Field::Latitude => form.latitude.clear(),
                Field::Longitude => form.longitude.clear(),
                Field::Shelter => unreachable!(),
            }
            let before = form.clone();

            let err = form.submit(&mut roster, &strict()).unwrap_err();

            assert_eq!(err, FormError::MissingField(field));
            assert_eq!(form, before);
            assert_eq!(roster.member_count(), 0);
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut roster = Roster::new();
        let mut form = alice_form();
        form.name = "   ".to_string();

        let err = form.submit(&mut roster, &strict()).unwrap_err();
        assert_eq!(err, FormError::MissingField(Field::Name));
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut roster = Roster::new();
        let mut form = MemberForm {
            name: "  Alice ".to_string(),
            shelter: " Gym ".to_string(),
            latitude: " 1.5".to_string(),
            longitude: "2.5 ".to_string(),
        };

        let member = form.submit(&mut roster, &strict()).unwrap();
        assert_eq!(member.name, "Alice");
        assert_eq!(member.shelter.as_deref(), Some("Gym"));
    }

    #[test]
    fn test_required_shelter() {
        let rules = FormsConfig {
            require_member_shelter: true,
            ..FormsConfig::default()
        };
        let mut roster = Roster::new();
        let mut form = alice_form();

        let err = form.submit(&mut roster, &rules).unwrap_err();
        assert_eq!(err, FormError::MissingField(Field::Shelter));
        assert_eq!(roster.member_count(), 0);

        form.shelter = "School Gym".to_string();
        let member = form.submit(&mut roster, &rules).unwrap();
        assert_eq!(member.shelter.as_deref(), Some("School Gym"));
    }

    #[test]
    fn test_non_numeric_rejected_by_default() {
        let mut roster = Roster::new();
        let mut form = alice_form();
        form.latitude = "north".to_string();
        let before = form.clone();

        let err = form.submit(&mut roster, &strict()).unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidNumber {
                field: Field::Latitude,
                value: "north".to_string(),
            }
        );
        assert_eq!(form, before);
        assert_eq!(roster.member_count(), 0);
    }

    #[test]
    fn test_non_finite_rejected_by_default() {
        let mut roster = Roster::new();
        let mut form = alice_form();
        form.longitude = "NaN".to_string();

        assert!(form.submit(&mut roster, &strict()).is_err());
    }

    #[test]
    fn test_lenient_mode_accepts_nan() {
        let mut roster = Roster::new();
        let mut form = alice_form();
        form.latitude = "north".to_string();

        let member = form.submit(&mut roster, &lenient()).unwrap();
        assert!(member.position.latitude.is_nan());
        assert!(form.is_blank());
    }

    #[test]
    fn test_shelter_submit() {
        let mut roster = Roster::new();
        let mut form = ShelterForm {
            name: "Camp".to_string(),
            latitude: "10".to_string(),
            longitude: "-20.5".to_string(),
        };

        let shelter = form.submit(&mut roster, &strict()).unwrap();
        assert_eq!(shelter.name, "Camp");
        assert!((shelter.position.longitude + 20.5).abs() < f64::EPSILON);
        assert!(form.is_blank());
        assert_eq!(roster.shelter_count(), 1);
    }

    #[test]
    fn test_shelter_submit_missing_name() {
        let mut roster = Roster::new();
        let mut form = ShelterForm {
            name: String::new(),
            latitude: "10".to_string(),
            longitude: "20".to_string(),
        };
        let before = form.clone();

        assert_eq!(
            form.submit(&mut roster, &strict()).unwrap_err(),
            FormError::MissingField(Field::Name)
        );
        assert_eq!(form, before);
        assert_eq!(roster.shelter_count(), 0);
    }

    #[test]
    fn test_form_error_display() {
        assert_eq!(
            FormError::MissingField(Field::Latitude).to_string(),
            "latitude is required"
        );
        let err = FormError::InvalidNumber {
            field: Field::Longitude,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "longitude is not a number: 'abc'");
    }
}
