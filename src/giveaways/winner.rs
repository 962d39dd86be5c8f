use super::domain::Participant;
use super::error::{GiveawayError, GiveawayResult};
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};

/// Picks one participant uniformly at random.
///
/// An empty set fails with [`GiveawayError::NotEnoughParticipants`]. A single
/// participant is returned without touching `rng`. Otherwise one index is
/// drawn from `[0, N)`; the `CryptoRng` bound keeps seeded generators out of
/// production draws.
pub fn select_winner<'a, R>(participants: &'a [Participant], rng: &mut R) -> GiveawayResult<&'a Participant>
where
    R: Rng + CryptoRng,
{
    match participants {
        [] => Err(GiveawayError::NotEnoughParticipants),
        [only] => Ok(only),
        _ => {
            let index = rng.gen_range(0..participants.len());
            Ok(&participants[index])
        }
    }
}

/// [`select_winner`] backed by the operating system's random source
pub fn draw_winner(participants: &[Participant]) -> GiveawayResult<&Participant> {
    select_winner(participants, &mut OsRng)
}
