use crate::bot::commands::{settings, HandlerResult};
use crate::bot::handlers::BotContext;
use crate::database::models::User;
use crate::giveaways::{GiveawayError, GiveawayResult};
use crate::utils::validation::{parse_participate_callback, SETTINGS_PREFIX};
use chrono::Utc;
use teloxide::prelude::*;

pub const JOINED_TEXT: &str = "✅ You are in! Good luck!";
pub const REJECTED_TEXT: &str = "❌ This giveaway is not accepting applications.";

/// Alert shown to the user after pressing the join button. Joining and
/// re-joining read the same, and every failure reads the same.
pub fn participation_reply(result: &GiveawayResult<()>) -> &'static str {
    match result {
        Ok(()) => JOINED_TEXT,
        Err(_) => REJECTED_TEXT,
    }
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    let user_id = q.from.id.0;
    let chat_id = q.message.as_ref().map(|m| m.chat.id.0).unwrap_or(0);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id)
            .text("Invalid callback data format")
            .await?;
        return Ok(());
    };

    tracing::info!(
        "Callback received: '{}' from user {} in chat {}",
        data,
        user_id,
        chat_id
    );

    if let Some(action) = data.strip_prefix(SETTINGS_PREFIX) {
        return settings::handle_settings_callback(bot, q, action, &ctx).await;
    }

    if let Some(giveaway_id) = parse_participate_callback(&data) {
        return handle_participate(bot, q, giveaway_id, &ctx).await;
    }

    bot.answer_callback_query(q.id).text("Unknown action").await?;
    Ok(())
}

async fn handle_participate(bot: Bot, q: CallbackQuery, giveaway_id: i64, ctx: &BotContext) -> HandlerResult {
    let user = &q.from;
    let user_id = user.id.0 as i64;
    let now = Utc::now();

    let result = match User::upsert(
        &ctx.db.pool,
        user_id,
        user.username.as_deref(),
        &user.first_name,
        now.timestamp(),
    )
    .await
    {
        Ok(()) => ctx.gate.participate(giveaway_id, user_id, now).await,
        Err(e) => Err(GiveawayError::Store(e.into())),
    };

    match &result {
        Ok(()) => {}
        Err(GiveawayError::NotFound) => tracing::debug!(
            "User {} could not join giveaway {}: not open",
            user_id,
            giveaway_id
        ),
        Err(e) => tracing::error!(
            "User {} could not join giveaway {}: {}",
            user_id,
            giveaway_id,
            e
        ),
    }

    bot.answer_callback_query(q.id)
        .text(participation_reply(&result))
        .show_alert(true)
        .await?;

    Ok(())
}
