//! # Lucky Pick Bot
//!
//! A Telegram bot that runs scheduled photo giveaways in groups.
//!
//! ## Features
//! - Admins schedule a giveaway by replying to a photo with `/giveaway`
//! - A background scheduler publishes, closes and finishes giveaways on time
//! - Members join with one button press; re-joining is harmless
//! - Winners are drawn uniformly from the operating system's secure random source
//! - Persistent storage with SQLite and an audit trail of every action

/// Bot command handlers and update routing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database connection, row models and the SQLite-backed store
pub mod database;
/// Giveaway lifecycle, winner selection and participation rules
pub mod giveaways;
/// Background services: scheduler, Telegram gateway, health server
pub mod services;
/// Utility functions for datetime, validation, and formatting
pub mod utils;
