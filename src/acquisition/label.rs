// Label validation for operator input

use crate::error::AcquisitionError;

/// Parse an operator label
///
/// # Arguments
/// * `input` - Raw operator input; surrounding whitespace is ignored
/// * `min` / `max` - Inclusive accepted range
///
/// # Returns
/// * `Ok(i32)` - Integer label within range
/// * `Err(AcquisitionError::InvalidLabel)` - Non-integer or out-of-range input
pub fn parse_label(input: &str, min: i32, max: i32) -> Result<i32, AcquisitionError> {
    let trimmed = input.trim();
    match trimmed.parse::<i32>() {
        Ok(label) if (min..=max).contains(&label) => Ok(label),
        _ => Err(AcquisitionError::InvalidLabel {
            input: trimmed.to_string(),
            min,
            max,
        }),
    }
}
