use thiserror::Error;

/// Error type for invalid model configuration.
///
/// All of these are raised while setting a run up. Once time stepping has
/// started the solver cannot fail.
#[derive(Error, Debug)]
pub enum CanoakError {
    #[error("{0}")]
    Error(String),
    #[error("Dispersion matrix shape {found:?} does not match the configured (source layers, domain layers) = {expected:?}")]
    DispersionShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Invalid layer count: {0}")]
    InvalidLayerCount(String),
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Could not parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, CanoakError>`.
pub type CanoakResult<T> = Result<T, CanoakError>;

impl CanoakError {
    /// Shorthand for an [`CanoakError::InvalidParameter`] error.
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        CanoakError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
