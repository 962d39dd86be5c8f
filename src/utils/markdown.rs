//! Helpers for Telegram MarkdownV2 text.
//!
//! MarkdownV2 requires escaping of special characters to prevent formatting
//! issues, both in captions of giveaway posts and in announcements.

/// Escapes markdown special characters for MarkdownV2 parsing mode
///
/// # Example
/// ```
/// use lucky_pick_bot::utils::markdown::escape_markdown;
///
/// let escaped = escape_markdown("Prize: *phone* (new)");
/// assert_eq!(escaped, "Prize: \\*phone\\* \\(new\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
        '\\',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Mentions a user in MarkdownV2.
///
/// Prefers `@username`, then a first-name link, then the numeric id as link
/// text.
pub fn mention_user(user_id: i64, username: Option<&str>, first_name: &str) -> String {
    match username.filter(|u| !u.is_empty()) {
        Some(username) => format!("@{}", escape_markdown(username)),
        None if !first_name.trim().is_empty() => {
            format!("[{}](tg://user?id={})", escape_markdown(first_name.trim()), user_id)
        }
        None => format!("[{user_id}](tg://user?id={user_id})"),
    }
}
