use super::domain::{Giveaway, Winner};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a chat side effect
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Chat side effects the lifecycle depends on.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Posts the giveaway to its group and returns the message id
    async fn publish(&self, giveaway: &Giveaway) -> Result<i64, GatewayError>;

    /// Pins a message in a group chat
    async fn pin(&self, chat_id: i64, message_id: i64) -> Result<(), GatewayError>;

    /// Unpins a message in a group chat
    async fn unpin(&self, chat_id: i64, message_id: i64) -> Result<(), GatewayError>;

    /// Announces the drawn winner in the giveaway's group
    async fn notify_winner(&self, winner: &Winner) -> Result<(), GatewayError>;
}
