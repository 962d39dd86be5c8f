use crate::bot::commands::HandlerResult;
use crate::bot::handlers::BotContext;
use crate::database::models::Group;
use crate::giveaways::{ActionLog, ActionType};
use crate::utils::logging::{log_database_error, log_system_event};
use chrono::Utc;
use sqlx::SqlitePool;
use teloxide::types::{ChatMemberKind, ChatMemberUpdated};

/// What a change of the bot's own membership means for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAccess {
    /// Owner or administrator: giveaways can be posted and pinned
    Granted,
    /// Demoted, restricted, left, kicked or banned
    Revoked,
}

impl BotAccess {
    pub fn from_kind(kind: &ChatMemberKind) -> Self {
        if kind.is_privileged() {
            BotAccess::Granted
        } else {
            BotAccess::Revoked
        }
    }
}

/// Registers or re-enables the group when the bot gains admin rights and
/// disables it when they are lost, so the scheduler stops posting to a chat
/// it can no longer reach. Returns whether a group row was touched.
pub async fn sync_group_access(
    pool: &SqlitePool,
    actions: &dyn ActionLog,
    chat_id: i64,
    title: &str,
    changed_by: i64,
    access: BotAccess,
) -> Result<bool, sqlx::Error> {
    match access {
        BotAccess::Granted => {
            let group = Group::enable(pool, chat_id, title, Utc::now().timestamp()).await?;
            actions
                .log(
                    ActionType::GroupEnabled,
                    Some(changed_by),
                    None,
                    &format!("Bot promoted in group {} ({})", group.title, chat_id),
                )
                .await;
            Ok(true)
        }
        BotAccess::Revoked => {
            let disabled = Group::disable(pool, chat_id).await?;
            if disabled {
                actions
                    .log(
                        ActionType::GroupDisabled,
                        Some(changed_by),
                        None,
                        &format!("Bot lost admin rights in group {chat_id}"),
                    )
                    .await;
            }
            Ok(disabled)
        }
    }
}

pub async fn my_chat_member_handler(update: ChatMemberUpdated, ctx: BotContext) -> HandlerResult {
    if !(update.chat.is_group() || update.chat.is_supergroup()) {
        return Ok(());
    }

    let chat_id = update.chat.id.0;
    let access = BotAccess::from_kind(&update.new_chat_member.kind);
    let title = update.chat.title().unwrap_or("Untitled group");

    match sync_group_access(
        &ctx.db.pool,
        ctx.actions.as_ref(),
        chat_id,
        title,
        update.from.id.0 as i64,
        access,
    )
    .await
    {
        Ok(changed) => log_system_event(
            "Bot membership changed",
            Some(&format!("chat {chat_id}: {access:?}, group updated: {changed}")),
        ),
        Err(e) => log_database_error(
            "sync membership",
            "groups",
            &e.to_string(),
            Some(&format!("chat {chat_id}")),
        ),
    }

    Ok(())
}
