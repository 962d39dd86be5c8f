use async_trait::async_trait;
use std::fmt;

/// Kinds of entries written to the action log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    GiveawayCreated,
    GiveawayPublished,
    GiveawayClosed,
    GiveawayFinished,
    GiveawayCancelled,
    GiveawayParticipated,
    GroupEnabled,
    GroupDisabled,
    SettingChanged,
}

impl ActionType {
    /// Value stored in `action_logs.action_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::GiveawayCreated => "giveaway.created",
            ActionType::GiveawayPublished => "giveaway.published",
            ActionType::GiveawayClosed => "giveaway.closed",
            ActionType::GiveawayFinished => "giveaway.finished",
            ActionType::GiveawayCancelled => "giveaway.cancelled",
            ActionType::GiveawayParticipated => "giveaway.participated",
            ActionType::GroupEnabled => "group.enabled",
            ActionType::GroupDisabled => "group.disabled",
            ActionType::SettingChanged => "setting.changed",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit trail collaborator.
///
/// Logging is fire-and-forget: implementations report their own failures
/// and never hand them back to the caller.
#[async_trait]
pub trait ActionLog: Send + Sync {
    /// Appends one entry
    async fn log(
        &self,
        action: ActionType,
        user_id: Option<i64>,
        giveaway_id: Option<i64>,
        description: &str,
    );
}
