use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl RegistryError {
    pub fn invalid_argument(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidArgument { field, reason } => {
                format!("Invalid input for {}: {}", field, reason)
            }
            Self::IoError(e) => format!("Could not access the candidates file: {}", e),
            Self::SerializationError(e) => {
                format!("The candidates file is not valid JSON: {}", e)
            }
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "Check the command arguments and try again",
            Self::IoError(_) => "Check that the candidates path exists and is writable",
            Self::SerializationError(_) => {
                "Fix or move the candidates file; it must contain a JSON array of candidates"
            }
            Self::MissingConfigError { .. } => {
                "Set storage.candidates_path in the config file or pass --candidates-path"
            }
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file for typos and unsupported values"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
