/// Admin commands
pub mod commands;
/// Update routing for messages and button presses
pub mod handlers;
