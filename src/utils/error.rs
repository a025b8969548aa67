use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Every failure the bot can report. Cloneable so one failed attempt can be
/// returned to all callers that waited on it.
#[derive(Error, Debug, Clone)]
pub enum BotError {
    #[error("Missing configuration: {field}")]
    ConfigMissing { field: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Upstream request timed out ({0:?})")]
    Timeout(Duration),

    #[error("Upstream transport failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    #[error("Wrong upstream response code={status} ({url})")]
    UpstreamStatus { status: u16, url: String },

    #[error("Upstream response decode error: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type Result<T> = std::result::Result<T, BotError>;

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        BotError::Transport(Arc::new(e))
    }
}

impl From<serde_json::Error> for BotError {
    fn from(e: serde_json::Error) -> Self {
        BotError::Decode(Arc::new(e))
    }
}

impl From<std::io::Error> for BotError {
    fn from(e: std::io::Error) -> Self {
        BotError::Io(Arc::new(e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
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

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::ConfigMissing { .. }
            | BotError::InvalidConfigValue { .. }
            | BotError::ConfigParse { .. } => ErrorCategory::Configuration,
            BotError::Timeout(_) | BotError::Transport(_) => ErrorCategory::Network,
            BotError::UpstreamStatus { .. } => ErrorCategory::Upstream,
            BotError::Decode(_) => ErrorCategory::Data,
            BotError::Io(_) | BotError::Internal { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Upstream | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether a caller may reasonably try the same request again later.
    /// The core itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            BotError::Timeout(_) | BotError::Transport(_) => true,
            BotError::UpstreamStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::ConfigMissing { field } => {
                format!("Configuration value '{}' is required but not set", field)
            }
            BotError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            BotError::ConfigParse { .. } => "Configuration file could not be parsed".to_string(),
            BotError::Timeout(timeout) => {
                format!("Translation service did not answer within {:?}", timeout)
            }
            BotError::Transport(_) => "Translation service is unreachable".to_string(),
            BotError::UpstreamStatus { status, .. } => {
                format!("Translation service answered with status {}", status)
            }
            BotError::Decode(_) => "Translation service returned an unexpected answer".to_string(),
            BotError::Io(e) => format!("File system error: {}", e),
            BotError::Internal { .. } => "Internal error while calling the service".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BotError::ConfigMissing { .. } => {
                "Set the missing value in the configuration file or its environment variable"
            }
            BotError::InvalidConfigValue { .. } => "Fix the configuration value and restart",
            BotError::ConfigParse { .. } => "Check the configuration file for TOML syntax errors",
            BotError::Timeout(_) => "Increase api.timeout_seconds or check upstream latency",
            BotError::Transport(_) => "Check network connectivity and the upstream endpoint URLs",
            BotError::UpstreamStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check that the API keys are valid"
            }
            BotError::UpstreamStatus { .. } => "Retry later; the upstream service reported a failure",
            BotError::Decode(_) => "Check that the endpoint URLs point to the expected API version",
            BotError::Io(_) => "Check file paths and permissions",
            BotError::Internal { .. } => "Inspect the logs for a panic in the request task",
        }
    }
}
