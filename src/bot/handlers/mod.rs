pub mod callback;
pub mod membership;
pub mod message;

use crate::bot::commands::Command;
use crate::database::connection::DatabaseManager;
use crate::giveaways::{ActionLog, GiveawayStore, ParticipationGate};
use std::sync::Arc;
use teloxide::types::ChatMemberUpdated;
use teloxide::{dispatching::UpdateHandler, prelude::*};

/// Collaborators shared by every update endpoint
#[derive(Clone)]
pub struct BotContext {
    pub db: DatabaseManager,
    pub store: Arc<dyn GiveawayStore>,
    pub gate: ParticipationGate,
    pub actions: Arc<dyn ActionLog>,
}

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let ctx = self.ctx.clone();
        let ctx_callback = self.ctx.clone();
        let ctx_membership = self.ctx.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let ctx = ctx_callback.clone();
                async move { callback::callback_handler(bot, q, ctx).await }
            }))
            .branch(Update::filter_my_chat_member().endpoint(move |update: ChatMemberUpdated| {
                let ctx = ctx_membership.clone();
                async move { membership::my_chat_member_handler(update, ctx).await }
            }))
    }
}
