//! Giveaway lifecycle core: statuses and transitions, winner selection,
//! the participation gate, and the collaborator interfaces (store,
//! messaging gateway, action log) they run against.

pub mod audit;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod participation;
pub mod settings;
pub mod status;
pub mod store;
pub mod winner;

pub use audit::{ActionLog, ActionType};
pub use domain::{Giveaway, GiveawayDraft, GiveawayPatch, Participant, Winner};
pub use error::{GiveawayError, GiveawayResult, StoreError};
pub use gateway::{GatewayError, MessagingGateway};
pub use participation::ParticipationGate;
pub use settings::GiveawaySettings;
pub use status::GiveawayStatus;
pub use store::GiveawayStore;
