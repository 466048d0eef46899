use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} responded with HTTP {status}: {body}")]
    UnexpectedStatus {
        source_name: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected anti-bot response: {value}")]
    UnexpectedChallenge { value: String },

    #[error("Challenge was not resolved: {message}")]
    ChallengeAborted { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
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
    Network,
    Challenge,
    Config,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::Http(_) | StatsError::UnexpectedStatus { .. } => ErrorCategory::Network,
            StatsError::UnexpectedChallenge { .. } | StatsError::ChallengeAborted { .. } => {
                ErrorCategory::Challenge
            }
            StatsError::ConfigError { .. }
            | StatsError::ConfigValidationError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::MissingConfigError { .. }
            | StatsError::UrlError(_) => ErrorCategory::Config,
            StatsError::CsvError(_) | StatsError::SerializationError(_) => ErrorCategory::Data,
            StatsError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StatsError::Http(e) if e.is_timeout() || e.is_connect() => ErrorSeverity::Medium,
            StatsError::UnexpectedStatus { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            StatsError::ChallengeAborted { .. } => ErrorSeverity::Medium,
            StatsError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StatsError::Http(e) if e.is_timeout() => {
                "Raise timeout_seconds or check the network connection".to_string()
            }
            StatsError::Http(_) => "Check the network connection and the API base URL".to_string(),
            StatsError::UnexpectedStatus { status: 401 | 403, .. } => {
                "Check the API credentials (SUPERJOB_API_TOKEN)".to_string()
            }
            StatsError::UnexpectedStatus { status: 400, .. } => {
                "Check the query parameters and the User-Agent setting".to_string()
            }
            StatsError::UnexpectedStatus { .. } => {
                "The job board is unavailable right now, try again later".to_string()
            }
            StatsError::UnexpectedChallenge { .. } => {
                "The job board blocked the client; wait before running again".to_string()
            }
            StatsError::ChallengeAborted { .. } => {
                "Run interactively and confirm once the captcha is solved".to_string()
            }
            StatsError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            StatsError::ConfigError { .. }
            | StatsError::ConfigValidationError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::UrlError(_) => "Fix the configuration file or CLI flags".to_string(),
            StatsError::CsvError(_) | StatsError::SerializationError(_) => {
                "The response or report could not be (de)serialized; check the API shape"
                    .to_string()
            }
            StatsError::IoError(_) => "Check file permissions and free disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch vacancies: {}", self),
            ErrorCategory::Challenge => format!("Anti-bot check interrupted the run: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
