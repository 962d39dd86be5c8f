use super::groups::require_group_admin;
use super::{is_chat_admin, HandlerResult};
use crate::bot::handlers::BotContext;
use crate::database::models::{Group, GroupSetting};
use crate::giveaways::settings::{LLM_DESCRIPTION_KEY, SETTING_DEFINITIONS};
use crate::giveaways::{ActionType, GiveawaySettings};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start};
use crate::utils::markdown::escape_markdown;
use crate::utils::validation::SETTINGS_PREFIX;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

const CLOSE_ACTION: &str = "close";

fn on_off(value: bool) -> &'static str {
    if value {
        "✅ on"
    } else {
        "❌ off"
    }
}

/// MarkdownV2 body of the settings message
pub fn format_settings(settings: &GiveawaySettings) -> String {
    let mut text = String::from("⚙️ *Group Settings*\n\n");
    for def in SETTING_DEFINITIONS {
        let value = match def.key {
            LLM_DESCRIPTION_KEY => settings.llm_description,
            _ => continue,
        };
        text.push_str(&format!(
            "*{}*: {}\n_{}_\n\n",
            escape_markdown(def.label),
            on_off(value),
            escape_markdown(def.description),
        ));
    }
    text
}

fn settings_keyboard(settings: &GiveawaySettings) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = SETTING_DEFINITIONS
        .iter()
        .filter(|def| def.key == LLM_DESCRIPTION_KEY)
        .map(|def| {
            vec![InlineKeyboardButton::callback(
                format!("{}: {}", def.label, on_off(settings.llm_description)),
                format!("{SETTINGS_PREFIX}{}", def.key),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "❌ Close",
        format!("{SETTINGS_PREFIX}{CLOSE_ACTION}"),
    )]);
    InlineKeyboardMarkup::new(rows)
}

async fn load_settings(ctx: &BotContext, group_id: i64) -> Result<GiveawaySettings, Box<dyn std::error::Error + Send + Sync>> {
    let values = GroupSetting::load_map(&ctx.db.pool, group_id).await?;
    Ok(GiveawaySettings::from_map(&values).unwrap_or_else(|e| {
        tracing::warn!("Invalid settings for group {}, using defaults: {}", group_id, e);
        GiveawaySettings::default()
    }))
}

pub async fn handle_settings(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user_id) = require_group_admin(&bot, &msg, &feedback).await? else {
        return Ok(());
    };
    log_command_start("settings", username, user_id, chat_id, None);

    let group = match Group::find_by_chat_id(&ctx.db.pool, chat_id).await {
        Ok(Some(group)) => group,
        Ok(None) => {
            feedback.error("Giveaways are not enabled here. Run /start first.").await?;
            return Ok(());
        }
        Err(e) => {
            log_command_error("settings", user_id, chat_id, &e.to_string());
            feedback.error("Error accessing group settings.").await?;
            return Ok(());
        }
    };

    let settings = load_settings(ctx, group.id).await?;

    bot.send_message(msg.chat.id, format_settings(&settings))
        .reply_markup(settings_keyboard(&settings))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    Ok(())
}

/// Handles `settings:<key>` toggles and `settings:close`
pub async fn handle_settings_callback(bot: Bot, q: CallbackQuery, action: &str, ctx: &BotContext) -> HandlerResult {
    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    if !is_chat_admin(&bot, message.chat.id, q.from.id).await? {
        bot.answer_callback_query(q.id)
            .text("Only group administrators can change settings")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    if action == CLOSE_ACTION {
        bot.delete_message(message.chat.id, message.id).await?;
        bot.answer_callback_query(q.id).text("Settings closed").await?;
        return Ok(());
    }

    if action != LLM_DESCRIPTION_KEY {
        bot.answer_callback_query(q.id).text("Unknown setting").await?;
        return Ok(());
    }

    let Some(group) = Group::find_by_chat_id(&ctx.db.pool, message.chat.id.0).await? else {
        bot.answer_callback_query(q.id).text("Run /start first").await?;
        return Ok(());
    };

    let mut settings = load_settings(ctx, group.id).await?;
    settings.llm_description = !settings.llm_description;
    GroupSetting::set(
        &ctx.db.pool,
        group.id,
        LLM_DESCRIPTION_KEY,
        if settings.llm_description { "true" } else { "false" },
    )
    .await?;

    ctx.actions
        .log(
            ActionType::SettingChanged,
            Some(q.from.id.0 as i64),
            None,
            &format!("{} set to {} in group {}", LLM_DESCRIPTION_KEY, settings.llm_description, group.id),
        )
        .await;

    bot.edit_message_text(message.chat.id, message.id, format_settings(&settings))
        .reply_markup(settings_keyboard(&settings))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    bot.answer_callback_query(q.id).text("Saved").await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_settings_shows_state() {
        let text = format_settings(&GiveawaySettings { llm_description: true });
        assert!(text.contains("Use AI for descriptions"));
        assert!(text.contains("✅ on"));

        let text = format_settings(&GiveawaySettings::default());
        assert!(text.contains("❌ off"));
    }

    #[test]
    fn test_keyboard_has_toggle_and_close() {
        let keyboard = settings_keyboard(&GiveawaySettings::default());
        assert_eq!(keyboard.inline_keyboard.len(), 2);
    }
}
