use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a giveaway.
///
/// Statuses only ever move forward:
/// `scheduled -> active -> closed -> finished | cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiveawayStatus {
    /// Created, waiting for its publish date
    Scheduled,
    /// Posted to the group and accepting applications
    Active,
    /// Applications closed, waiting for the results date
    Closed,
    /// A winner was drawn
    Finished,
    /// Nobody applied, no winner
    Cancelled,
}

/// Raised when a status column holds text that is not a known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown giveaway status: {0}")]
pub struct UnknownStatus(pub String);

impl GiveawayStatus {
    /// Text stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            GiveawayStatus::Scheduled => "scheduled",
            GiveawayStatus::Active => "active",
            GiveawayStatus::Closed => "closed",
            GiveawayStatus::Finished => "finished",
            GiveawayStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, GiveawayStatus::Finished | GiveawayStatus::Cancelled)
    }

    /// Whether `next` is the direct successor of this status
    pub fn can_transition_to(&self, next: GiveawayStatus) -> bool {
        matches!(
            (self, next),
            (GiveawayStatus::Scheduled, GiveawayStatus::Active)
                | (GiveawayStatus::Active, GiveawayStatus::Closed)
                | (GiveawayStatus::Closed, GiveawayStatus::Finished)
                | (GiveawayStatus::Closed, GiveawayStatus::Cancelled)
        )
    }
}

impl fmt::Display for GiveawayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GiveawayStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(GiveawayStatus::Scheduled),
            "active" => Ok(GiveawayStatus::Active),
            "closed" => Ok(GiveawayStatus::Closed),
            "finished" => Ok(GiveawayStatus::Finished),
            "cancelled" => Ok(GiveawayStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
