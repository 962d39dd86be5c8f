pub mod giveaway;
pub mod groups;
pub mod settings;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// Result type of every update endpoint
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Giveaway bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Enable giveaways in this group (admins only)")]
    Start,
    #[command(description = "Stop publishing giveaways in this group (admins only)")]
    Disable,
    #[command(
        description = "Reply to a photo: publish | applications end | results | description [| anonymous]"
    )]
    Giveaway(String),
    #[command(description = "Configure group settings (admins only)")]
    Settings,
}

/// Whether the user is an owner or administrator of the chat
pub async fn is_chat_admin(bot: &Bot, chat_id: ChatId, user_id: UserId) -> ResponseResult<bool> {
    let member = bot.get_chat_member(chat_id, user_id).await?;
    Ok(member.kind.is_privileged())
}
