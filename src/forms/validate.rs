pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("Price must be greater than 0")]
    NonPositivePrice,
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Checks a submitted form and turns it into what the backend expects.
///
/// Runs before any network call; an error here means nothing was sent.
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationError>;
}

/// Confirmation-only forms (deletions) have nothing to check.
impl Validate for () {
    type Output = ();

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// The trimmed value, or `Required` when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_owned())
}

fn number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or(ValidationError::NotANumber(field))
}

pub fn price(value: &str) -> Result<f64, ValidationError> {
    let price = number("Price", &required("Price", value)?)?;
    if price <= 0.0 {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(price)
}

pub fn rating(value: &str) -> Result<u8, ValidationError> {
    let rating = required("Rating", value)?
        .parse::<i64>()
        .map_err(|_| ValidationError::RatingOutOfRange)?;
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange);
    }
    Ok(rating as u8)
}

/// Blank means "not given" and falls back to 0.
pub fn coordinate(
    field: &'static str,
    value: &str,
    limit: f64,
) -> Result<f64, ValidationError> {
    if value.trim().is_empty() {
        return Ok(0.0);
    }
    let coordinate = number(field, value)?;
    if !(-limit..=limit).contains(&coordinate) {
        return Err(ValidationError::OutOfRange {
            field,
            min: -limit,
            max: limit,
        });
    }
    Ok(coordinate)
}

/// Passwords are sent as typed, only blank ones count as missing.
pub fn password(value: &str) -> Result<String, ValidationError> {
    required("Password", value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(value.to_owned())
}
