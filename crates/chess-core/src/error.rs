use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Square or move text that does not have the expected shape.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Rule that exists in the API but has no implementation yet.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(String),
}
