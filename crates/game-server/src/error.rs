use chess_core::RuleError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidPlayer(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl AppError {
    /// True when the request itself was wrong (400/404 class) rather than
    /// the engine or its storage.
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::Rule(RuleError::InvalidFormat(_)) => true,
            AppError::Rule(_) => false,
            AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::InvalidPlayer(_)
            | AppError::Conflict(_) => true,
            AppError::Internal(_) | AppError::Sqlx(_) => false,
        }
    }

    pub(crate) fn game_not_found(game_id: i64) -> Self {
        AppError::NotFound(format!("Game {game_id} not found"))
    }
}
