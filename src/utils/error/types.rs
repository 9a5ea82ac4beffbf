//! Error type definitions

use thiserror::Error;

/// Result type alias for the trust layer
pub type Result<T> = std::result::Result<T, TrustError>;

/// Main error type for the trust layer
#[derive(Error, Debug)]
pub enum TrustError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A role or access request that does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transition attempted from a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Attempt to delete or overwrite one of the built-in roles
    #[error("cannot modify built-in role: {0}")]
    BuiltinRole(String),

    /// Creation of something that already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A reviewer tried to approve their own access request
    #[error("cannot approve your own access request")]
    SelfApproval,

    /// Policy violations such as an unknown role
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    /// Token that is not three well-formed segments
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Token past its expiry
    #[error("token expired")]
    TokenExpired,

    /// Token signature did not verify
    #[error("invalid signature")]
    SignatureMismatch,

    /// Access request past its deadline
    #[error("access request has expired: {0}")]
    RequestExpired(String),

    /// Persistence collaborator errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden errors
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
