use crate::cache::CacheError;

// Input rejected before any request leaves the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    InvalidNameFormat(String),
    UnknownType(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "Pokemon name cannot be empty"),
            ValidationError::InvalidNameFormat(name) => {
                write!(f, "Invalid Pokemon name format: {}", name)
            }
            ValidationError::UnknownType(name) => write!(f, "Unknown type: {}", name),
        }
    }
}

impl std::error::Error for ValidationError {}

// Non-success status returned by the remote catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub endpoint: String,
    pub status: u16,
    pub status_text: String,
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to fetch {}: {} {}",
            self.endpoint, self.status, self.status_text
        )
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    NetworkError(String),
    CacheError(String),
    ParseError(String),
    StorageError(String),
    Validation(ValidationError),
    Fetch(FetchError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::CacheError(msg) => write!(f, "Cache error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            AppError::Validation(err) => write!(f, "{}", err),
            AppError::Fetch(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(err) => Some(err),
            AppError::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::CacheError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message_names_endpoint_and_status() {
        let err = FetchError {
            endpoint: "/pokemon/missingno".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch /pokemon/missingno: 404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::EmptyName.to_string(),
            "Pokemon name cannot be empty"
        );
        let err = AppError::from(ValidationError::InvalidNameFormat("pi@chu".to_string()));
        assert!(err.to_string().contains("pi@chu"));
    }
}
