//! Giveaway state machine.
//!
//! Every function here is pure: it decides whether a giveaway may move to
//! its next status and builds the [`GiveawayPatch`] describing the change.
//! Side effects and persistence are left to the scheduler tasks.

use super::audit::ActionType;
use super::domain::{Giveaway, GiveawayPatch, Participant};
use super::error::{GiveawayError, GiveawayResult};
use super::status::GiveawayStatus;
use super::winner::select_winner;
use chrono::{DateTime, Utc};
use rand::{CryptoRng, Rng};

/// One edge of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `scheduled -> active`
    Publish,
    /// `active -> closed`
    Close,
    /// `closed -> finished`
    Finish,
    /// `closed -> cancelled`
    Cancel,
}

impl Transition {
    /// Status the giveaway must be in
    pub fn from_status(&self) -> GiveawayStatus {
        match self {
            Transition::Publish => GiveawayStatus::Scheduled,
            Transition::Close => GiveawayStatus::Active,
            Transition::Finish | Transition::Cancel => GiveawayStatus::Closed,
        }
    }

    /// Status the giveaway ends up in
    pub fn to_status(&self) -> GiveawayStatus {
        match self {
            Transition::Publish => GiveawayStatus::Active,
            Transition::Close => GiveawayStatus::Closed,
            Transition::Finish => GiveawayStatus::Finished,
            Transition::Cancel => GiveawayStatus::Cancelled,
        }
    }

    /// Audit entry type written once the transition is stored
    pub fn action(&self) -> ActionType {
        match self {
            Transition::Publish => ActionType::GiveawayPublished,
            Transition::Close => ActionType::GiveawayClosed,
            Transition::Finish => ActionType::GiveawayFinished,
            Transition::Cancel => ActionType::GiveawayCancelled,
        }
    }
}

/// Time predicate of a transition.
///
/// These are the same conditions the store's `list_due_*` queries apply.
pub fn is_due(transition: Transition, giveaway: &Giveaway, now: DateTime<Utc>) -> bool {
    if giveaway.status != transition.from_status() {
        return false;
    }

    match transition {
        Transition::Publish => giveaway.publish_date <= now && giveaway.group_active,
        Transition::Close => giveaway.application_end_date <= now,
        Transition::Finish | Transition::Cancel => giveaway.results_date <= now,
    }
}

/// Fails with `InvalidTransition` unless the giveaway sits in the source status
pub fn ensure_can(giveaway: &Giveaway, transition: Transition) -> GiveawayResult<()> {
    let to = transition.to_status();
    if giveaway.status != transition.from_status() || !giveaway.status.can_transition_to(to) {
        return Err(GiveawayError::InvalidTransition {
            from: giveaway.status,
            to,
        });
    }
    Ok(())
}

fn patch(giveaway: &Giveaway, transition: Transition) -> GiveawayPatch {
    GiveawayPatch {
        id: giveaway.id,
        expected: transition.from_status(),
        status: Some(transition.to_status()),
        telegram_message_id: None,
        winner_user_id: None,
    }
}

/// `scheduled -> active`, recording the id of the posted message
pub fn publish(giveaway: &Giveaway, message_id: i64) -> GiveawayResult<GiveawayPatch> {
    ensure_can(giveaway, Transition::Publish)?;
    Ok(GiveawayPatch {
        telegram_message_id: Some(message_id),
        ..patch(giveaway, Transition::Publish)
    })
}

/// `active -> closed`
pub fn close(giveaway: &Giveaway) -> GiveawayResult<GiveawayPatch> {
    ensure_can(giveaway, Transition::Close)?;
    Ok(patch(giveaway, Transition::Close))
}

/// What the finish step decided for one giveaway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishDecision {
    /// Either [`Transition::Finish`] or [`Transition::Cancel`]
    pub transition: Transition,
    pub patch: GiveawayPatch,
    pub winner: Option<Participant>,
}

/// `closed -> finished` with a drawn winner, or `closed -> cancelled` when
/// nobody applied.
pub fn finish<R>(
    giveaway: &Giveaway,
    participants: &[Participant],
    rng: &mut R,
) -> GiveawayResult<FinishDecision>
where
    R: Rng + CryptoRng,
{
    ensure_can(giveaway, Transition::Finish)?;

    match select_winner(participants, rng) {
        Ok(winner) => Ok(FinishDecision {
            transition: Transition::Finish,
            patch: GiveawayPatch {
                winner_user_id: Some(winner.user_id),
                ..patch(giveaway, Transition::Finish)
            },
            winner: Some(winner.clone()),
        }),
        Err(GiveawayError::NotEnoughParticipants) => Ok(FinishDecision {
            transition: Transition::Cancel,
            patch: patch(giveaway, Transition::Cancel),
            winner: None,
        }),
        Err(e) => Err(e),
    }
}
