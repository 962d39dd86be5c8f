pub mod action_log;
pub mod giveaway;
pub mod group;
pub mod user;

pub use action_log::*;
pub use giveaway::*;
pub use group::*;
pub use user::*;
