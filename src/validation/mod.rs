use bigdecimal::BigDecimal;
use std::fmt;

pub const ACCOUNT_NAME_MAX_LEN: usize = 100;
pub const AMOUNT_INPUT_MAX_LEN: u64 = 64;
pub const AMOUNT_MAX_SCALE: i64 = 2;
pub const AMOUNT_MAX_INTEGER_DIGITS: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Sanitizes and checks an account holder name, returning the cleaned value.
pub fn validate_account_name(name: &str) -> Result<String, ValidationError> {
    let name = sanitize_string(name);
    validate_required("name", &name)?;
    validate_max_len("name", &name, ACCOUNT_NAME_MAX_LEN)?;
    Ok(name)
}

pub fn validate_account_number(field: &'static str, number: i64) -> ValidationResult {
    if number <= 0 {
        return Err(ValidationError::new(field, "must be a positive integer"));
    }

    Ok(())
}

/// Bounds the size of a money value: at most `AMOUNT_MAX_SCALE` decimal
/// places and `AMOUNT_MAX_INTEGER_DIGITS` integer digits. Must run before any
/// arithmetic on untrusted input, since comparing decimals rescales them.
pub fn validate_money(field: &'static str, value: &BigDecimal) -> ValidationResult {
    let (int_val, scale) = value.as_bigint_and_exponent();
    // Bit length is constant time; formatting a huge integer is not.
    if int_val.bits() > 4 * AMOUNT_INPUT_MAX_LEN {
        return Err(ValidationError::new(field, "has too many digits"));
    }

    let digits = int_val.magnitude().to_string();
    if digits.len() as u64 > AMOUNT_INPUT_MAX_LEN {
        return Err(ValidationError::new(field, "has too many digits"));
    }

    let significant = digits.trim_end_matches('0');
    if significant.is_empty() {
        return Ok(());
    }

    let scale = scale.saturating_sub((digits.len() - significant.len()) as i64);
    if scale > AMOUNT_MAX_SCALE {
        return Err(ValidationError::new(
            field,
            format!("must have at most {} decimal places", AMOUNT_MAX_SCALE),
        ));
    }

    if (significant.len() as i64).saturating_sub(scale) > AMOUNT_MAX_INTEGER_DIGITS {
        return Err(ValidationError::new(
            field,
            format!("must have at most {} integer digits", AMOUNT_MAX_INTEGER_DIGITS),
        ));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    validate_money("amount", amount)?;
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

pub fn validate_non_negative(field: &'static str, value: &BigDecimal) -> ValidationResult {
    validate_money(field, value)?;
    if value < &BigDecimal::from(0) {
        return Err(ValidationError::new(field, "must not be negative"));
    }

    Ok(())
}

pub fn validate_distinct_accounts(source: i64, receiver: i64) -> ValidationResult {
    if source == receiver {
        return Err(ValidationError::new(
            "receiver_account_number",
            "must differ from source_account_number",
        ));
    }

    Ok(())
}
