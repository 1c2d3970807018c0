//! Error types for Tana

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TanaError>;

#[derive(Error, Debug)]
pub enum TanaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TanaError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TanaError::InvalidInput(_) => 3,
            TanaError::Config(_) => 1,
            TanaError::Store(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = TanaError::InvalidInput("no such user".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = TanaError::Config(ConfigError::MissingField("config directory".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_store_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error = TanaError::Store(StoreError::Io(io));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = TanaError::InvalidInput("user name 'a' is ambiguous".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid input: user name 'a' is ambiguous"
        );

        let error = TanaError::Config(ConfigError::MissingField("data directory".to_string()));
        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing required field: data directory"
        );
    }

    #[test]
    fn test_error_conversion_from_store_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: TanaError = StoreError::Io(io).into();
        assert!(matches!(error, TanaError::Store(_)));
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let error: TanaError = ConfigError::MissingField("x".to_string()).into();
        assert!(matches!(error, TanaError::Config(_)));
    }
}
