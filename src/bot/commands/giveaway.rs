use super::groups::require_group_admin;
use super::HandlerResult;
use crate::bot::handlers::BotContext;
use crate::database::models::{Group, GroupSetting};
use crate::giveaways::{ActionType, GiveawayDraft, GiveawaySettings};
use crate::utils::datetime::format_datetime;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};
use crate::utils::validation::parse_giveaway_command;
use chrono::Utc;
use teloxide::prelude::*;

const USAGE_HINT: &str = "Reply to a photo with: /giveaway 24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 | Prize description [| anonymous]. Dates are UTC.";

/// File id of the largest size of the photo the command replies to
fn replied_photo(msg: &Message) -> Option<String> {
    msg.reply_to_message()
        .and_then(|reply| reply.photo())
        .and_then(|sizes| sizes.last())
        .map(|photo| photo.file.id.clone())
}

pub async fn handle_giveaway(bot: Bot, msg: Message, args: String, ctx: &BotContext) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user_id) = require_group_admin(&bot, &msg, &feedback).await? else {
        return Ok(());
    };
    log_command_start("giveaway", username, user_id, chat_id, Some(&args));

    let group = match Group::find_by_chat_id(&ctx.db.pool, chat_id).await {
        Ok(Some(group)) if group.is_active => group,
        Ok(_) => {
            feedback.error("Giveaways are not enabled here. Run /start first.").await?;
            return Ok(());
        }
        Err(e) => {
            log_command_error("giveaway", user_id, chat_id, &e.to_string());
            feedback.error("Could not load group, please try again later.").await?;
            return Ok(());
        }
    };

    let Some(photo_file_id) = replied_photo(&msg) else {
        feedback.validation_error("A giveaway needs a photo.", USAGE_HINT).await?;
        return Ok(());
    };

    let parsed = match parse_giveaway_command(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            feedback.validation_error(&e.to_string(), USAGE_HINT).await?;
            return Ok(());
        }
    };

    let now = Utc::now();
    if parsed.application_end_date <= now {
        feedback
            .validation_error("Applications must end in the future.", USAGE_HINT)
            .await?;
        return Ok(());
    }

    let settings = match GroupSetting::load_map(&ctx.db.pool, group.id).await {
        Ok(values) => GiveawaySettings::from_map(&values).unwrap_or_else(|e| {
            tracing::warn!("Invalid settings for group {}, using defaults: {}", group.id, e);
            GiveawaySettings::default()
        }),
        Err(e) => {
            tracing::warn!("Failed to load settings for group {}, using defaults: {}", group.id, e);
            GiveawaySettings::default()
        }
    };

    let draft = GiveawayDraft {
        group_id: group.id,
        admin_user_id: user_id,
        photo_file_id,
        description: settings.prepare_description(&parsed.description),
        publish_date: parsed.publish_date,
        application_end_date: parsed.application_end_date,
        results_date: parsed.results_date,
        is_anonymous: parsed.is_anonymous,
    };

    if let Err(e) = draft.validate() {
        feedback.validation_error(&e.to_string(), USAGE_HINT).await?;
        return Ok(());
    }

    let giveaway = match ctx.store.create(&draft, now).await {
        Ok(giveaway) => giveaway,
        Err(e) => {
            log_command_error("giveaway", user_id, chat_id, &e.to_string());
            feedback.error("Could not save the giveaway, please try again later.").await?;
            return Ok(());
        }
    };

    ctx.actions
        .log(
            ActionType::GiveawayCreated,
            Some(user_id),
            Some(giveaway.id),
            "Created giveaway",
        )
        .await;
    log_command_success("giveaway", user_id, chat_id, Some(&format!("giveaway {}", giveaway.id)));

    let anonymity = if giveaway.is_anonymous { " The winner will not be named publicly." } else { "" };
    feedback
        .success(&format!(
            "Giveaway #{} scheduled for {}. Applications close {}, results {}.{}",
            giveaway.id,
            format_datetime(&giveaway.publish_date),
            format_datetime(&giveaway.application_end_date),
            format_datetime(&giveaway.results_date),
            anonymity,
        ))
        .await?;

    Ok(())
}
