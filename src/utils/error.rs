use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    CacheError(#[from] crate::cache::CacheError),

    #[error("Benchmark error: {0}")]
    BenchmarkError(#[from] crate::benchmark::BenchmarkError),

    #[error("Data error: {0}")]
    DataError(#[from] crate::data::DataError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Suite execution error: {message}")]
    ExecutionError { message: String },

    #[error("Report error: {message}")]
    ReportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Execution,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BenchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BenchError::ConfigError { .. }
            | BenchError::ConfigValidationError { .. }
            | BenchError::MissingConfigError { .. }
            | BenchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BenchError::CsvError(_) | BenchError::DataError(_) => ErrorCategory::Data,
            BenchError::CacheError(_)
            | BenchError::BenchmarkError(_)
            | BenchError::ExecutionError { .. } => ErrorCategory::Execution,
            BenchError::ZipError(_)
            | BenchError::IoError(_)
            | BenchError::SerializationError(_)
            | BenchError::ReportError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Execution => ErrorSeverity::Critical,
            // 報告寫入失敗時基準結果已經算完，可以重試
            ErrorCategory::Output => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BenchError::ConfigError { .. } | BenchError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and values"
            }
            BenchError::MissingConfigError { .. } => "Add the missing field to the configuration",
            BenchError::InvalidConfigValueError { .. } => {
                "Correct the value; run with --help to see accepted ranges"
            }
            BenchError::CsvError(_) | BenchError::DataError(_) => {
                "Regenerate the data file with --generate-data or point --data-file at a valid key;value CSV"
            }
            BenchError::CacheError(_) => "Use a cache capacity of at least 1",
            BenchError::BenchmarkError(_) => "This is a bug in the suite definition",
            BenchError::ExecutionError { .. } => "Re-run with --verbose to see which scenario failed",
            BenchError::ZipError(_) | BenchError::IoError(_) | BenchError::ReportError { .. } => {
                "Make sure the output directory exists and is writable"
            }
            BenchError::SerializationError(_) => "Try another report format",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not read benchmark data: {}", self),
            ErrorCategory::Execution => format!("Benchmark run failed: {}", self),
            ErrorCategory::Output => format!("Could not write reports: {}", self),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        BenchError::ConfigError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
