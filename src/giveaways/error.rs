use super::gateway::GatewayError;
use super::status::GiveawayStatus;
use thiserror::Error;

/// Errors raised by the persistence layer behind [`super::store::GiveawayStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt giveaway row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Errors of the giveaway lifecycle core.
#[derive(Debug, Error)]
pub enum GiveawayError {
    /// Absent, or outside its publish/application window
    #[error("giveaway not found")]
    NotFound,

    #[error("not enough participants")]
    NotEnoughParticipants,

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: GiveawayStatus,
        to: GiveawayStatus,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Messaging(#[from] GatewayError),
}

/// Result alias used across the lifecycle core
pub type GiveawayResult<T> = Result<T, GiveawayError>;
