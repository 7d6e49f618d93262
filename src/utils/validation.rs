use crate::utils::error::{Result, SolarError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_latitude(value: f64) -> Result<()> {
    validate_coordinate("latitude", value, -90.0, 90.0)
}

pub fn validate_longitude(value: f64) -> Result<()> {
    validate_coordinate("longitude", value, -180.0, 180.0)
}

fn validate_coordinate(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(SolarError::InvalidCoordinate {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 解析座標字串，失敗視為無效座標
pub fn parse_coordinate(field_name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| SolarError::InvalidCoordinate {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: format!("not a number: {}", e),
        })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SolarError::ConfigError {
            message: format!(
                "{} = {} is out of range, must be between {} and {}",
                field_name, value, min, max
            ),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SolarError::ConfigError {
            message: format!("{} must be at least {}", field_name, min_value),
        });
    }
    Ok(())
}
