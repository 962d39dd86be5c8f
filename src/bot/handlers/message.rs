use crate::bot::commands::{giveaway, groups, settings, Command, HandlerResult};
use crate::bot::handlers::BotContext;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

pub async fn command_handler(bot: Bot, msg: Message, cmd: Command, ctx: BotContext) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => groups::handle_start(bot, msg, &ctx).await?,
        Command::Disable => groups::handle_disable(bot, msg, &ctx).await?,
        Command::Giveaway(args) => giveaway::handle_giveaway(bot, msg, args, &ctx).await?,
        Command::Settings => settings::handle_settings(bot, msg, &ctx).await?,
    }
    Ok(())
}
