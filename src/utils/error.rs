use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadReadyError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Cancel failed")]
    CancelFailed { status: Option<u16> },

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

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RoadReadyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }

    /// HTTP status attached to the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::CancelFailed { status } => *status,
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::ApiError { .. } | Self::CancelFailed { .. } => {
                ErrorSeverity::Medium
            }
            Self::AuthError { .. } | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorSeverity::High
            }
            Self::IoError(_)
            | Self::UrlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError { status: 401, .. } => {
                "Your session expired or you're not authorized. Please log in again.".to_string()
            }
            Self::ApiError { message, .. } => message.clone(),
            Self::HttpError(e) if e.is_timeout() => "The server took too long to respond.".to_string(),
            Self::HttpError(_) => "Could not reach the RoadReady server.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError { status: 401, .. } | Self::AuthError { .. } => {
                "Run `roadready login` and try again"
            }
            Self::ApiError { status: 404, .. } => "Check the API base URL and route",
            Self::HttpError(_) => "Check that the API server is running and reachable",
            Self::ApiError { .. } | Self::CancelFailed { .. } => "Try again later",
            Self::ValidationError { .. } => "Fix the input and retry",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::UrlError(_) => "Check the configuration file and command-line flags",
            Self::IoError(_) => "Check file permissions and paths",
            Self::SerializationError(_) | Self::CsvError(_) => {
                "The server response had an unexpected shape"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RoadReadyError>;
