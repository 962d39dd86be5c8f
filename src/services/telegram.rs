use crate::giveaways::{GatewayError, Giveaway, MessagingGateway, Participant, Winner};
use crate::utils::datetime::format_datetime;
use crate::utils::markdown::{escape_markdown, mention_user};
use crate::utils::validation::participate_callback_data;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode};

/// Text of the join button under every giveaway post
pub const JOIN_BUTTON_TEXT: &str = "✅ I want it!";

/// [`MessagingGateway`] talking to the Telegram Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn message_id(raw: i64) -> Result<MessageId, GatewayError> {
    i32::try_from(raw)
        .map(MessageId)
        .map_err(|_| GatewayError::Rejected(format!("message id {raw} out of range")))
}

/// MarkdownV2 caption of a giveaway post
pub fn format_giveaway_caption(giveaway: &Giveaway) -> String {
    format!(
        "🎁 *Giveaway\\!*\n\n{}\n\n⏳ Applications until: {}\n🏆 Results: {}",
        escape_markdown(&giveaway.description),
        escape_markdown(&format_datetime(&giveaway.application_end_date)),
        escape_markdown(&format_datetime(&giveaway.results_date)),
    )
}

/// MarkdownV2 announcement of a finished draw
pub fn format_winner_announcement(giveaway: &Giveaway, winner: &Participant) -> String {
    if giveaway.is_anonymous {
        return "🎉 The winner has been drawn\\! The organizer will contact them privately\\.".to_string();
    }
    format!(
        "🎉 Congratulations to {}, the winner of this giveaway\\!",
        mention_user(winner.user_id, winner.username.as_deref(), &winner.first_name)
    )
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn publish(&self, giveaway: &Giveaway) -> Result<i64, GatewayError> {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            JOIN_BUTTON_TEXT,
            participate_callback_data(giveaway.id),
        )]]);

        let message = self
            .bot
            .send_photo(
                ChatId(giveaway.group_chat_id),
                InputFile::file_id(giveaway.photo_file_id.clone()),
            )
            .caption(format_giveaway_caption(giveaway))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboard)
            .await?;

        Ok(i64::from(message.id.0))
    }

    async fn pin(&self, chat_id: i64, message_id_raw: i64) -> Result<(), GatewayError> {
        self.bot
            .pin_chat_message(ChatId(chat_id), message_id(message_id_raw)?)
            .disable_notification(true)
            .await?;
        Ok(())
    }

    async fn unpin(&self, chat_id: i64, message_id_raw: i64) -> Result<(), GatewayError> {
        self.bot
            .unpin_chat_message(ChatId(chat_id))
            .message_id(message_id(message_id_raw)?)
            .await?;
        Ok(())
    }

    async fn notify_winner(&self, winner: &Winner) -> Result<(), GatewayError> {
        let giveaway = &winner.giveaway;
        let Some(participant) = winner.participant.as_ref() else {
            return Err(GatewayError::Rejected(format!(
                "giveaway {} has no winner to announce",
                giveaway.id
            )));
        };

        let mut request = self
            .bot
            .send_message(
                ChatId(giveaway.group_chat_id),
                format_winner_announcement(giveaway, participant),
            )
            .parse_mode(ParseMode::MarkdownV2)
            .allow_sending_without_reply(true);

        if let Some(raw) = giveaway.telegram_message_id {
            request = request.reply_to_message_id(message_id(raw)?);
        }

        request.await?;
        Ok(())
    }
}
