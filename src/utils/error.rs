use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Format error: {message}")]
    FormatError { message: String },

    #[error("Percentage undefined for {team}: no points conceded")]
    DivisionUndefined { team: String },

    #[error("Fetch failed for {url}: HTTP {status}")]
    FetchError { url: String, status: u16 },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Computation,
    Network,
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

impl EtlError {
    /// 建立格式錯誤
    pub fn format(message: impl Into<String>) -> Self {
        EtlError::FormatError {
            message: message.into(),
        }
    }

    /// 建立帶行號的格式錯誤
    pub fn format_at(line: usize, message: impl std::fmt::Display) -> Self {
        EtlError::FormatError {
            message: format!("line {}: {}", line, message),
        }
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, EtlError::FormatError { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FormatError { .. } => ErrorCategory::Input,
            EtlError::DivisionUndefined { .. } => ErrorCategory::Computation,
            EtlError::FetchError { .. } | EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Computation | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::FormatError { .. } => {
                "Check that the input file matches the selected layout (bg3.txt = games, bg7.txt = attendance)".to_string()
            }
            EtlError::DivisionUndefined { .. } => {
                "Use --percentage-policy propagate to keep non-finite percentages".to_string()
            }
            EtlError::FetchError { url, .. } => {
                format!("Verify that {} is reachable, or place the file in the data directory", url)
            }
            EtlError::ApiError(_) => {
                "Check network connectivity and the configured base URL".to_string()
            }
            EtlError::IoError(_) => "Check file permissions and available disk space".to_string(),
            EtlError::ZipError(_) | EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Retry with a different output path or without compression".to_string()
            }
            EtlError::ConfigError { .. } | EtlError::ConfigValidationError { .. } => {
                "Review the configuration file syntax and values".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            EtlError::MissingConfigError { field } => format!("Provide a value for '{}'", field),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The results feed could not be read: {}", self),
            ErrorCategory::Computation => format!("The ladder could not be computed: {}", self),
            ErrorCategory::Network => format!("The results feed could not be downloaded: {}", self),
            ErrorCategory::Output => format!("The ladder could not be saved: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
