use crate::giveaways::GiveawayStatus;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_START: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_START: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_SUCCESS: {} by {} in chat {} - {}", command, user_id, chat_id, d),
        None => info!("CMD_SUCCESS: {} by {} in chat {}", command, user_id, chat_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        "CMD_ERROR: {} by {} in chat {} - {}",
        command, user_id, chat_id, error
    );
}

/// Logs a stored status change
pub fn log_transition(giveaway_id: i64, from: GiveawayStatus, to: GiveawayStatus, details: Option<&str>) {
    match details {
        Some(d) => info!("TRANSITION: giveaway {} {} -> {} - {}", giveaway_id, from, to, d),
        None => info!("TRANSITION: giveaway {} {} -> {}", giveaway_id, from, to),
    }
}

/// Logs a transition that was attempted but not stored
pub fn log_transition_failure(task: &str, giveaway_id: i64, error: &str) {
    error!("TRANSITION_ERROR: {} failed for giveaway {} - {}", task, giveaway_id, error);
}

/// Logs a transition skipped because another writer got there first
pub fn log_transition_stale(task: &str, giveaway_id: i64, expected: GiveawayStatus) {
    warn!(
        "TRANSITION_STALE: {} skipped giveaway {}, no longer {}",
        task, giveaway_id, expected
    );
}

/// Logs a best-effort side effect that failed without blocking the transition
pub fn log_side_effect_failure(effect: &str, giveaway_id: i64, error: &str) {
    warn!("SIDE_EFFECT: {} failed for giveaway {} - {}", effect, giveaway_id, error);
}

/// Logs the outcome of one scheduler task
pub fn log_task_finished(task: &str, processed: usize, skipped: usize, failed: usize, elapsed: Duration) {
    if failed > 0 {
        warn!(
            "TASK: {} finished in {}ms - {} processed, {} skipped, {} failed",
            task,
            elapsed.as_millis(),
            processed,
            skipped,
            failed
        );
    } else {
        info!(
            "TASK: {} finished in {}ms - {} processed, {} skipped",
            task,
            elapsed.as_millis(),
            processed,
            skipped
        );
    }
}

/// Logs a join attempt that passed the gate
pub fn log_join(giveaway_id: i64, user_id: i64, first_join: bool) {
    if first_join {
        info!("JOIN: user {} joined giveaway {}", user_id, giveaway_id);
    } else {
        debug!("JOIN: user {} already in giveaway {}", user_id, giveaway_id);
    }
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

/// Logs timeout events with consistent format
pub fn log_timeout(operation: &str, duration_secs: u64, details: Option<&str>) {
    match details {
        Some(d) => warn!("TIMEOUT: {} after {}s - {}", operation, duration_secs, d),
        None => warn!("TIMEOUT: {} after {}s", operation, duration_secs),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
