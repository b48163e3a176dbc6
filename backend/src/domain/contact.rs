//! Kenyan phone numbers and national identity numbers.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{Field, FieldViolation, ViolationCode};

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static ID_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^(?:\+254|254|0)[17][0-9]{8}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn id_number_regex() -> &'static Regex {
    ID_NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{6,8}$")
            .unwrap_or_else(|error| panic!("id number regex failed to compile: {error}"))
    })
}

/// A Safaricom/Airtel style mobile number (`07…`, `01…`, `2547…`, `+2547…`).
///
/// The number is stored as entered (trimmed); no normalisation to E.164 is
/// applied so staff see what they typed.
///
/// # Examples
/// ```
/// use motofinance::domain::KenyanPhone;
/// use motofinance::domain::validation::Field;
///
/// let field = Field::new("primaryPhone", "Primary phone");
/// assert!(KenyanPhone::parse(field, "0712345678").is_ok());
/// assert!(KenyanPhone::parse(field, "0812345678").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KenyanPhone(String);

impl KenyanPhone {
    /// Validate a required phone number.
    pub fn parse(field: Field, raw: &str) -> Result<Self, FieldViolation> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(FieldViolation::new(
                field,
                ViolationCode::Required,
                format!("{} is required", field.label()),
            ));
        }
        if !phone_regex().is_match(value) {
            return Err(FieldViolation::new(
                field,
                ViolationCode::InvalidFormat,
                "Please enter a valid Kenyan phone number",
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Validate an optional phone number; blank input is "not provided".
    pub fn parse_optional(field: Field, raw: Option<&str>) -> Result<Option<Self>, FieldViolation> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Self::parse(field, value).map(Some),
            None => Ok(None),
        }
    }

    /// Rehydrate a stored number without validation.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Borrow the number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KenyanPhone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// National identity card number: six to eight digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdNumber(String);

impl IdNumber {
    /// Validate an identity number.
    pub fn parse(field: Field, raw: &str) -> Result<Self, FieldViolation> {
        let value = raw.trim();
        if !id_number_regex().is_match(value) {
            return Err(FieldViolation::new(
                field,
                ViolationCode::InvalidFormat,
                "ID number must be 6-8 digits",
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Rehydrate a stored identity number without validation.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Borrow the digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    const PHONE: Field = Field::new("primaryPhone", "Primary phone");
    const ID: Field = Field::new("idNumber", "ID number");

    #[rstest]
    #[case("0712345678")]
    #[case("0112345678")]
    #[case("254712345678")]
    #[case("+254112345678")]
    #[case(" 0722000111 ")]
    fn accepts_kenyan_mobile_numbers(#[case] raw: &str) {
        assert!(KenyanPhone::parse(PHONE, raw).is_ok());
    }

    #[rstest]
    #[case("0212345678")]
    #[case("071234567")]
    #[case("07123456789")]
    #[case("+255712345678")]
    #[case("07-1234-5678")]
    #[case("07١٢٣٤٥٦٧٨")]
    fn rejects_other_numbers(#[case] raw: &str) {
        let violation = KenyanPhone::parse(PHONE, raw).expect_err("invalid phone");
        assert_eq!(violation.code(), ViolationCode::InvalidFormat);
    }

    #[rstest]
    fn blank_optional_phone_is_absent() {
        assert_eq!(KenyanPhone::parse_optional(PHONE, Some("")).expect("blank ok"), None);
    }

    #[rstest]
    #[case("123456", true)]
    #[case("12345678", true)]
    #[case("12345", false)]
    #[case("123456789", false)]
    #[case("12A456", false)]
    #[case("١٢٣٤٥٦٧", false)]
    fn id_numbers_are_six_to_eight_digits(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(IdNumber::parse(ID, raw).is_ok(), ok);
    }
}
