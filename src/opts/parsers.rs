use std::str::FromStr;

use online_mf::prelude::*;

pub fn positive_f64(value: &str) -> Result<f64> {
    match f64::from_str(value)? {
        value if value > 0.0 && !value.is_nan() => Ok(value),
        value => Err(anyhow!("expected a positive number, got {}", value)),
    }
}

pub fn non_negative_f64(value: &str) -> Result<f64> {
    match f64::from_str(value)? {
        value if value.is_finite() && value >= 0.0 => Ok(value),
        value => Err(anyhow!("expected a non-negative number, got {}", value)),
    }
}

pub fn finite_f64(value: &str) -> Result<f64> {
    match f64::from_str(value)? {
        value if value.is_finite() => Ok(value),
        value => Err(anyhow!("expected a finite number, got {}", value)),
    }
}

pub fn unit_interval(value: &str) -> Result<f64> {
    match f64::from_str(value)? {
        value if (0.0..=1.0).contains(&value) => Ok(value),
        value => Err(anyhow!("expected a number within [0, 1], got {}", value)),
    }
}

pub fn sample_rate(value: &str) -> Result<f32> {
    match f32::from_str(value)? {
        value if (0.0..=1.0).contains(&value) => Ok(value),
        value => Err(anyhow!("expected a sample rate within [0, 1], got {}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_f64_ok() -> Result {
        assert_eq!(positive_f64("0.1")?, 0.1);
        assert_eq!(positive_f64("1e12")?, 1e12);
        assert!(positive_f64("0").is_err());
        assert!(positive_f64("-1").is_err());
        assert!(positive_f64("NaN").is_err());
        assert!(positive_f64("abc").is_err());
        Ok(())
    }

    #[test]
    fn non_negative_f64_ok() -> Result {
        assert_eq!(non_negative_f64("0")?, 0.0);
        assert!(non_negative_f64("-0.5").is_err());
        assert!(non_negative_f64("inf").is_err());
        Ok(())
    }

    #[test]
    fn unit_interval_ok() -> Result {
        assert_eq!(unit_interval("0.9")?, 0.9);
        assert!(unit_interval("1.5").is_err());
        Ok(())
    }
}
