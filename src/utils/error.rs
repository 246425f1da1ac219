use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Service error during {operation}: HTTP {status}")]
    ServiceError {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {operation}: {message}")]
    InvalidResponse { operation: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Action '{action}' is not allowed while {state}")]
    InvalidAction { action: String, state: String },

    #[error("Action '{action}' rejected: a request is already in flight")]
    Busy { action: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
    Configuration,
    Input,
    Flow,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::TransportError(_) => ErrorCategory::Network,
            ClientError::ServiceError { .. } | ClientError::InvalidResponse { .. } => {
                ErrorCategory::Service
            }
            ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ClientError::ValidationError { .. } => ErrorCategory::Input,
            ClientError::InvalidAction { .. } | ClientError::Busy { .. } => ErrorCategory::Flow,
            ClientError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Flow => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Service => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 網路與服務錯誤可由使用者重新觸發同一個動作
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::TransportError(_) | ClientError::Busy { .. } => true,
            ClientError::ServiceError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ClientError::TransportError(_) => {
                "Check that the recommendation service is running and the backend URL is reachable"
                    .to_string()
            }
            ClientError::ServiceError { status, .. } if *status >= 500 => {
                "The service failed internally; try the same action again in a moment".to_string()
            }
            ClientError::ServiceError { .. } => {
                "The service rejected the request; review the profile fields and resubmit"
                    .to_string()
            }
            ClientError::InvalidResponse { .. } => {
                "The service answered with an unexpected payload; verify the backend version"
                    .to_string()
            }
            ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags and restart".to_string()
            }
            ClientError::ValidationError { field, .. } => {
                format!("Fill in '{}' and submit again", field)
            }
            ClientError::InvalidAction { .. } => {
                "Use one of the actions offered by the current screen".to_string()
            }
            ClientError::Busy { .. } => "Wait for the current request to finish".to_string(),
            ClientError::IoError(_) => {
                "Restart the client; if the problem persists run with --verbose".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Could not reach the recommendation service".to_string(),
            ErrorCategory::Service => "The recommendation service could not complete the request".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input | ErrorCategory::Flow => self.to_string(),
            ErrorCategory::System => format!("Unexpected client failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
