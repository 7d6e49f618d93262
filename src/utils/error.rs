use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolarError {
    #[error("Location unresolved: missing {}", missing.join(", "))]
    LocationUnresolved { missing: Vec<String> },

    #[error("Invalid coordinate for {field}: '{value}' ({reason})")]
    InvalidCoordinate {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid timezone: '{value}'")]
    InvalidTimezone { value: String },

    #[error("Event '{event}' does not occur on {date}")]
    EventNotObservable { event: String, date: String },

    #[error("Location command '{command}' unavailable: {reason}")]
    SubprocessUnavailable { command: String, reason: String },

    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Ephemeris calculation failed: {0}")]
    Ephemeris(#[from] solar_positioning::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolarError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Location,
    Computation,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 對應的程序退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SolarError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SolarError::LocationUnresolved { .. }
            | SolarError::InvalidCoordinate { .. }
            | SolarError::InvalidTimezone { .. }
            | SolarError::SubprocessUnavailable { .. } => ErrorCategory::Location,
            SolarError::EventNotObservable { .. }
            | SolarError::InvalidDate { .. }
            | SolarError::Ephemeris(_) => ErrorCategory::Computation,
            SolarError::IoError(_)
            | SolarError::CsvError(_)
            | SolarError::SerializationError(_) => ErrorCategory::Output,
            SolarError::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SolarError::SubprocessUnavailable { .. } => ErrorSeverity::Low,
            SolarError::EventNotObservable { .. } => ErrorSeverity::Medium,
            SolarError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 可忽略的錯誤：解析鏈記錄後繼續下一個來源
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SolarError::SubprocessUnavailable { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SolarError::LocationUnresolved { .. } => {
                "Pass --lat/--lon/--tz, export LATITUDE/LONGITUDE/TIMEZONE, or add them to ~/.config/location".to_string()
            }
            SolarError::InvalidCoordinate { .. } => {
                "Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string()
            }
            SolarError::InvalidTimezone { .. } => {
                "Use an IANA timezone name such as America/Denver".to_string()
            }
            SolarError::EventNotObservable { .. } => {
                "The sun does not reach that depression on this date; try another date or event".to_string()
            }
            SolarError::SubprocessUnavailable { .. } => {
                "Install the location command or provide coordinates explicitly".to_string()
            }
            SolarError::InvalidDate { .. } => "Dates use the YYYY-MM-DD format".to_string(),
            SolarError::ConfigError { .. } => "Check the command line arguments".to_string(),
            SolarError::Ephemeris(_) => {
                "Check that the date lies within the supported range of the algorithm".to_string()
            }
            SolarError::IoError(_) | SolarError::CsvError(_) => {
                "Check that the output path is writable".to_string()
            }
            SolarError::SerializationError(_) => "Please report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SolarError::LocationUnresolved { missing } => format!(
                "Could not determine {} from arguments, environment or config files",
                missing.join(", ")
            ),
            other => other.to_string(),
        }
    }
}
