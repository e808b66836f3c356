// ABOUTME: Input validation utilities for API request handlers
// ABOUTME: Field-specific checks shared by registration and booking endpoints

use crate::response::ApiError;

pub const MIN_DONOR_AGE: i64 = 18;
pub const MAX_DONOR_AGE: i64 = 65;
pub const MIN_DONOR_WEIGHT_KG: f64 = 45.0;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_UNITS_PER_APPOINTMENT: i64 = 3;

/// Validate a 10-digit phone number.
pub fn validate_phone(phone: &str) -> Result<(), ApiError> {
    let trimmed = phone.trim();
    if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "Phone number must be exactly 10 digits".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().len() < 2 {
        return Err(ApiError::Validation(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Donors must be of donation age.
pub fn validate_donor_age(age: i64) -> Result<(), ApiError> {
    if !(MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&age) {
        return Err(ApiError::Validation(format!(
            "Donor age must be between {} and {}",
            MIN_DONOR_AGE, MAX_DONOR_AGE
        )));
    }
    Ok(())
}

/// Recipients only need a plausible age.
pub fn validate_recipient_age(age: i64) -> Result<(), ApiError> {
    if !(1..=120).contains(&age) {
        return Err(ApiError::Validation(
            "Recipient age must be between 1 and 120".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_donor_weight(weight: Option<f64>) -> Result<(), ApiError> {
    if let Some(w) = weight {
        if w < MIN_DONOR_WEIGHT_KG {
            return Err(ApiError::Validation(format!(
                "Donor weight must be at least {} kg",
                MIN_DONOR_WEIGHT_KG
            )));
        }
    }
    Ok(())
}

pub fn validate_units(units: i64) -> Result<(), ApiError> {
    if !(1..=MAX_UNITS_PER_APPOINTMENT).contains(&units) {
        return Err(ApiError::Validation(format!(
            "Units must be between 1 and {}",
            MAX_UNITS_PER_APPOINTMENT
        )));
    }
    Ok(())
}

/// Requested quantity for a blood request.
pub fn validate_quantity(quantity: i64) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::Validation(
            "Quantity must be at least 1 unit".to_string(),
        ));
    }
    Ok(())
}
