use super::{is_chat_admin, HandlerResult};
use crate::bot::handlers::BotContext;
use crate::database::models::Group;
use crate::giveaways::ActionType;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};
use crate::utils::validation::validate_telegram_chat_id;
use chrono::Utc;
use teloxide::prelude::*;

const PRIVATE_WELCOME: &str = "🎁 Welcome to Lucky Pick Bot!\n\n\
Add me to a group as an administrator and run /start there to enable giveaways.\n\
Use /help to see all commands.";

/// Checks that the command comes from a group admin and answers otherwise.
/// Returns the sender's id when the command may proceed.
pub(crate) async fn require_group_admin(
    bot: &Bot,
    msg: &Message,
    feedback: &CommandFeedback,
) -> Result<Option<i64>, Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = validate_telegram_chat_id(msg.chat.id.0) {
        feedback.error(&e.to_string()).await?;
        return Ok(None);
    }

    let Some(user) = msg.from() else {
        return Ok(None);
    };

    if !is_chat_admin(bot, msg.chat.id, user.id).await? {
        feedback.error("Only group administrators can use this command.").await?;
        return Ok(None);
    }

    Ok(Some(user.id.0 as i64))
}

pub async fn handle_start(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    if msg.chat.is_private() {
        bot.send_message(msg.chat.id, PRIVATE_WELCOME).await?;
        return Ok(());
    }

    let chat_id = msg.chat.id.0;
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user_id) = require_group_admin(&bot, &msg, &feedback).await? else {
        return Ok(());
    };
    log_command_start("start", username, user_id, chat_id, None);

    let title = msg.chat.title().unwrap_or("Untitled group");
    let group = match Group::enable(&ctx.db.pool, chat_id, title, Utc::now().timestamp()).await {
        Ok(group) => group,
        Err(e) => {
            log_command_error("start", user_id, chat_id, &e.to_string());
            feedback.error("Could not enable giveaways, please try again later.").await?;
            return Ok(());
        }
    };

    ctx.actions
        .log(
            ActionType::GroupEnabled,
            Some(user_id),
            None,
            &format!("Enabled group {} ({})", group.title, group.telegram_chat_id),
        )
        .await;
    log_command_success("start", user_id, chat_id, Some(&format!("group {}", group.id)));

    feedback
        .success("Giveaways are enabled. Reply to a photo with /giveaway to schedule one.")
        .await?;
    Ok(())
}

pub async fn handle_disable(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user_id) = require_group_admin(&bot, &msg, &feedback).await? else {
        return Ok(());
    };
    log_command_start("disable", username, user_id, chat_id, None);

    match Group::disable(&ctx.db.pool, chat_id).await {
        Ok(true) => {
            ctx.actions
                .log(
                    ActionType::GroupDisabled,
                    Some(user_id),
                    None,
                    &format!("Disabled group {chat_id}"),
                )
                .await;
            log_command_success("disable", user_id, chat_id, None);
            feedback
                .warning("Giveaways are disabled. Scheduled giveaways will not be published until /start is used again.")
                .await?;
        }
        Ok(false) => {
            feedback.info("Giveaways were never enabled in this group.").await?;
        }
        Err(e) => {
            log_command_error("disable", user_id, chat_id, &e.to_string());
            feedback.error("Could not disable giveaways, please try again later.").await?;
        }
    }

    Ok(())
}
