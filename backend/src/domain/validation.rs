//! Field-level validation shared by the domain input types.
//!
//! Every rule failure becomes a [`FieldViolation`] that names the offending
//! field in camelCase so clients can attach the message to the right input.

use serde_json::json;

use super::Error;
use super::money::Money;

/// A form field: wire name plus a human label used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    label: &'static str,
}

impl Field {
    /// Describe a field by its camelCase wire name and display label.
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }

    /// camelCase wire name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Human label.
    pub const fn label(&self) -> &'static str {
        self.label
    }
}

/// Machine-readable reason attached to a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCode {
    Required,
    TooShort,
    TooLong,
    OutOfRange,
    InvalidFormat,
    Mismatch,
    InvalidValue,
}

impl ViolationCode {
    /// Stable snake_case representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::OutOfRange => "out_of_range",
            Self::InvalidFormat => "invalid_format",
            Self::Mismatch => "mismatch",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldViolation {
    field: &'static str,
    code: ViolationCode,
    message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: Field, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.name(),
            code,
            message: message.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Reason code.
    pub fn code(&self) -> ViolationCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FieldViolation> for Error {
    fn from(violation: FieldViolation) -> Self {
        Error::invalid_request(violation.message).with_details(json!({
            "field": violation.field,
            "code": violation.code.as_str(),
        }))
    }
}

/// Trim `raw` and enforce a character-length window.
pub fn text(field: Field, raw: &str, min: usize, max: usize) -> Result<String, FieldViolation> {
    let value = raw.trim();
    let length = value.chars().count();
    if length == 0 && min > 0 {
        return Err(FieldViolation::new(
            field,
            ViolationCode::Required,
            format!("{} is required", field.label()),
        ));
    }
    if length < min {
        return Err(FieldViolation::new(
            field,
            ViolationCode::TooShort,
            format!("{} must be at least {min} characters", field.label()),
        ));
    }
    if length > max {
        return Err(FieldViolation::new(
            field,
            ViolationCode::TooLong,
            format!("{} must be less than {max} characters", field.label()),
        ));
    }
    Ok(value.to_owned())
}

/// Optional free text: absent or blank input means "not provided".
pub fn optional_text(
    field: Field,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldViolation> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => text(field, value, 1, max).map(Some),
        None => Ok(None),
    }
}

/// Inclusive integer range check.
pub fn int_in_range(field: Field, value: i64, min: i64, max: i64) -> Result<i64, FieldViolation> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldViolation::new(
            field,
            ViolationCode::OutOfRange,
            format!("{} must be between {min} and {max}", field.label()),
        ))
    }
}

/// Parse a shilling amount and require `0 < amount <= max`.
pub fn positive_amount(field: Field, shillings: f64, max: Money) -> Result<Money, FieldViolation> {
    let amount = parse_amount(field, shillings)?;
    if amount <= Money::ZERO {
        return Err(FieldViolation::new(
            field,
            ViolationCode::OutOfRange,
            format!("{} must be greater than 0", field.label()),
        ));
    }
    cap_amount(field, amount, max)
}

/// Parse a shilling amount and require `0 <= amount <= max`.
pub fn non_negative_amount(
    field: Field,
    shillings: f64,
    max: Money,
) -> Result<Money, FieldViolation> {
    let amount = parse_amount(field, shillings)?;
    if amount < Money::ZERO {
        return Err(FieldViolation::new(
            field,
            ViolationCode::OutOfRange,
            format!("{} cannot be negative", field.label()),
        ));
    }
    cap_amount(field, amount, max)
}

fn parse_amount(field: Field, shillings: f64) -> Result<Money, FieldViolation> {
    Money::from_shillings(shillings).map_err(|error| {
        FieldViolation::new(
            field,
            ViolationCode::InvalidFormat,
            format!("{}: {error}", field.label()),
        )
    })
}

fn cap_amount(field: Field, amount: Money, max: Money) -> Result<Money, FieldViolation> {
    if amount > max {
        return Err(FieldViolation::new(
            field,
            ViolationCode::OutOfRange,
            format!("{} cannot exceed KES {max}", field.label()),
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    const NAME: Field = Field::new("fullName", "Full name");
    const AMOUNT: Field = Field::new("amount", "Amount");

    #[rstest]
    #[case("  Jo  ", Ok("Jo"))]
    #[case("J", Err(ViolationCode::TooShort))]
    #[case("   ", Err(ViolationCode::Required))]
    #[case("abcdef", Err(ViolationCode::TooLong))]
    fn text_enforces_trimmed_length(
        #[case] raw: &str,
        #[case] expected: Result<&str, ViolationCode>,
    ) {
        let result = text(NAME, raw, 2, 5);
        match expected {
            Ok(value) => assert_eq!(result.expect("valid text"), value),
            Err(code) => assert_eq!(result.expect_err("invalid text").code(), code),
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    fn optional_text_treats_blank_as_absent(#[case] raw: Option<&str>) {
        assert_eq!(optional_text(NAME, raw, 10).expect("blank accepted"), None);
    }

    #[rstest]
    fn violation_converts_to_invalid_request_with_details() {
        let violation = text(NAME, "x", 2, 100).expect_err("too short");
        let error: Error = violation.into();
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "fullName");
        assert_eq!(details["code"], "too_short");
        assert_eq!(error.message(), "Full name must be at least 2 characters");
    }

    #[rstest]
    #[case(17, false)]
    #[case(18, true)]
    #[case(100, true)]
    #[case(101, false)]
    fn int_range_is_inclusive(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(int_in_range(NAME, value, 18, 100).is_ok(), ok);
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(0.01, true)]
    #[case(1000.0, true)]
    #[case(1000.01, false)]
    #[case(12.345, false)]
    fn positive_amount_bounds(#[case] shillings: f64, #[case] ok: bool) {
        let max = Money::from_shillings(1000.0).expect("valid max");
        assert_eq!(positive_amount(AMOUNT, shillings, max).is_ok(), ok);
    }

    #[rstest]
    fn non_negative_amount_accepts_zero() {
        let max = Money::from_shillings(10.0).expect("valid max");
        assert_eq!(
            non_negative_amount(AMOUNT, 0.0, max).expect("zero allowed"),
            Money::ZERO
        );
    }
}
