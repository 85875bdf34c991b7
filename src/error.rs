use thiserror::Error;

/// Main error type for the camera-filters library
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown filter: {name}")]
    UnknownFilter { name: String },

    #[error("Kernel unavailable for filter '{filter}': {reason}")]
    KernelUnavailable { filter: String, reason: String },

    #[error("Auxiliary input missing for filter '{filter}': {input}")]
    AuxiliaryInputMissing { filter: String, input: String },

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while resolving bundled assets
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {name} ({path})")]
    Missing { name: String, path: String },

    #[error("Failed to decode asset {path}: {reason}")]
    DecodeFailed { path: String, reason: String },

    #[error("Invalid kernel bundle {path}: {reason}")]
    InvalidBundle { path: String, reason: String },

    #[error("Invalid color lookup table: {reason}")]
    InvalidLut { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Catalog construction errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate filter name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid parameter {filter}.{key}: {details}")]
    InvalidParameter {
        filter: String,
        key: String,
        details: String,
    },
}

/// Convenience type alias for Results using FilterError
pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    pub fn unknown_filter<S: Into<String>>(name: S) -> Self {
        Self::UnknownFilter { name: name.into() }
    }

    /// Whether a frame hitting this error should be handed on unmodified
    ///
    /// Every failure of a single filter application is recovered this way;
    /// only configuration and I/O problems outside the per-frame path are not.
    pub fn is_passthrough(&self) -> bool {
        matches!(
            self,
            Self::UnknownFilter { .. }
                | Self::KernelUnavailable { .. }
                | Self::AuxiliaryInputMissing { .. }
                | Self::Asset(_)
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownFilter { name } => {
                format!("Filter '{}' not found. Use --list to see available filters.", name)
            }
            Self::KernelUnavailable { filter, .. } => {
                format!("Filter '{}' is disabled because its kernel could not be loaded.", filter)
            }
            Self::Asset(AssetError::Missing { path, .. }) => {
                format!("Asset '{}' not found. Please check the assets section of your configuration.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_classification() {
        assert!(FilterError::unknown_filter("nope").is_passthrough());
        assert!(FilterError::KernelUnavailable {
            filter: "glitch".to_string(),
            reason: "overlay missing".to_string(),
        }
        .is_passthrough());
        assert!(!FilterError::Config(ConfigError::FileNotFound {
            path: "x.toml".to_string()
        })
        .is_passthrough());
    }

    #[test]
    fn test_user_message_mentions_name() {
        let msg = FilterError::unknown_filter("sparkle").user_message();
        assert!(msg.contains("sparkle"));
    }
}
