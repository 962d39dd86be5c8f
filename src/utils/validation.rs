use crate::utils::datetime::parse_datetime;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

/// Callback data prefix of the join button
pub const PARTICIPATE_PREFIX: &str = "participate:";

/// Callback data prefix of settings toggles
pub const SETTINGS_PREFIX: &str = "settings:";

/// Parsed arguments of `/giveaway`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayArgs {
    pub publish_date: DateTime<Utc>,
    pub application_end_date: DateTime<Utc>,
    pub results_date: DateTime<Utc>,
    pub description: String,
    pub is_anonymous: bool,
}

/// Parses `<publish> | <end> | <results> | <description> [| anonymous]`.
///
/// Only the first three `|` separate fields, so the description may contain
/// `|` itself. A trailing `| anonymous` (or `| anon`) marks the giveaway
/// anonymous; any other trailing text stays part of the description.
pub fn parse_giveaway_command(input: &str) -> Result<GiveawayArgs> {
    let parts: Vec<&str> = input.splitn(4, '|').map(str::trim).collect();

    if parts.len() < 4 {
        return Err(anyhow!(
            "Expected at least 4 parts separated by '|', got {}",
            parts.len()
        ));
    }

    let publish_date = parse_datetime(parts[0])?;
    let application_end_date = parse_datetime(parts[1])?;
    let results_date = parse_datetime(parts[2])?;

    let (description, is_anonymous) = match parts[3].rsplit_once('|') {
        Some((text, flag)) if is_anonymous_flag(flag) => (text.trim(), true),
        _ => (parts[3], false),
    };
    validate_description(description)?;

    Ok(GiveawayArgs {
        publish_date,
        application_end_date,
        results_date,
        description: description.to_string(),
        is_anonymous,
    })
}

fn is_anonymous_flag(flag: &str) -> bool {
    let flag = flag.trim();
    flag.eq_ignore_ascii_case("anonymous") || flag.eq_ignore_ascii_case("anon")
}

pub fn validate_description(description: &str) -> Result<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(anyhow!("Description cannot be empty"));
    }

    if description.chars().count() < 3 {
        return Err(anyhow!("Description must be at least 3 characters long"));
    }

    Ok(())
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // Giveaways only run in groups and supergroups, which have negative ids
    if chat_id > 0 {
        return Err(anyhow!("Giveaways can only be run in group chats"));
    }

    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

/// Extracts the giveaway id from `participate:<id>`
pub fn parse_participate_callback(data: &str) -> Option<i64> {
    data.strip_prefix(PARTICIPATE_PREFIX)?
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
}

pub fn participate_callback_data(giveaway_id: i64) -> String {
    format!("{PARTICIPATE_PREFIX}{giveaway_id}")
}
