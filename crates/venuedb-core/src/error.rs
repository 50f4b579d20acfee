use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("venue has no name (source: {website})")]
    MissingName { website: String },

    #[error("venue \"{name}\" has no website")]
    MissingWebsite { name: String },
}
