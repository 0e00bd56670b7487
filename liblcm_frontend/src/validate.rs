use std::num::IntErrorKind;

use super::error::ValidationError;

/// How the text of a numeric field is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// Counts: whole numbers only
    Integer,
    /// Physical quantities
    Float,
}

/// Parse raw_text for field and check it against the closed interval [min, max].
///
/// Returns the parsed value on success.
pub fn validate(
    field: &str,
    raw_text: &str,
    kind: NumberKind,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let text = raw_text.trim();
    let value = match kind {
        NumberKind::Integer => match text.parse::<i64>() {
            Ok(v) => v as f64,
            // Still a number, just one too large to hold
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                text.parse::<f64>()
                    .map_err(|_| not_a_number(field, raw_text))?
            }
            Err(_) => return Err(not_a_number(field, raw_text)),
        },
        NumberKind::Float => text
            .parse::<f64>()
            .map_err(|_| not_a_number(field, raw_text))?,
    };

    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn not_a_number(field: &str, raw_text: &str) -> ValidationError {
    ValidationError::NotANumber {
        field: field.to_string(),
        text: raw_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_in_range() {
        assert_eq!(
            validate("pulse_sets", " 1000 ", NumberKind::Integer, 0.0, 131071.0),
            Ok(1000.0)
        );
        assert_eq!(
            validate("pulse_sets", "131071", NumberKind::Integer, 0.0, 131071.0),
            Ok(131071.0)
        );
    }

    #[test]
    fn test_count_out_of_range() {
        let result = validate("pulse_sets", "999999999999", NumberKind::Integer, 0.0, 131071.0);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
        let result = validate(
            "pulse_sets",
            "99999999999999999999999",
            NumberKind::Integer,
            0.0,
            131071.0,
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
        let result = validate("pulse_sets", "-1", NumberKind::Integer, 0.0, 131071.0);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_count_rejects_fraction() {
        let result = validate("pulse_sets", "1.5", NumberKind::Integer, 0.0, 131071.0);
        assert!(matches!(result, Err(ValidationError::NotANumber { .. })));
    }

    #[test]
    fn test_not_a_number() {
        for kind in [NumberKind::Integer, NumberKind::Float] {
            let result = validate("iu_pulse_delay", "abc", kind, 0.0, 13650.0);
            assert_eq!(
                result,
                Err(ValidationError::NotANumber {
                    field: String::from("iu_pulse_delay"),
                    text: String::from("abc"),
                })
            );
        }
    }

    #[test]
    fn test_float_bounds_are_closed() {
        assert_eq!(
            validate("pulse_height", "30", NumberKind::Float, 0.0, 30.0),
            Ok(30.0)
        );
        assert!(validate("pulse_height", "30.01", NumberKind::Float, 0.0, 30.0).is_err());
        assert!(validate("pulse_height", "NaN", NumberKind::Float, 0.0, 30.0).is_err());
    }
}
