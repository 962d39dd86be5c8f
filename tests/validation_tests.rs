use chrono::{Datelike, Timelike};
use lucky_pick_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_parse_full_giveaway_command() {
        let args = parse_giveaway_command(
            "24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:30 | Brand new e-reader",
        )
        .unwrap();

        assert_eq!((args.publish_date.day(), args.publish_date.month()), (24, 12));
        assert_eq!(args.application_end_date.hour(), 18);
        assert_eq!(
            (args.results_date.year(), args.results_date.minute()),
            (2026, 30)
        );
        assert_eq!(args.description, "Brand new e-reader");
        assert!(!args.is_anonymous);
    }

    #[test]
    fn test_parse_anonymous_flag() {
        for flag in ["anonymous", "ANON", " Anonymous "] {
            let input = format!("24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 | Prize | {flag}");
            let args = parse_giveaway_command(&input).unwrap();
            assert!(args.is_anonymous, "flag '{flag}' should mark the giveaway anonymous");
        }
    }

    #[test]
    fn test_parse_description_may_contain_separator() {
        let args = parse_giveaway_command(
            "24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 | Headphones | case | cable",
        )
        .unwrap();
        assert_eq!(args.description, "Headphones | case | cable");
        assert!(!args.is_anonymous);

        let args = parse_giveaway_command(
            "24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 | Prize | public",
        )
        .unwrap();
        assert_eq!(args.description, "Prize | public");
        assert!(!args.is_anonymous);
    }

    #[test]
    fn test_parse_anonymous_flag_after_separated_description() {
        let args = parse_giveaway_command(
            "24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 | Mug | tea set | anon",
        )
        .unwrap();
        assert_eq!(args.description, "Mug | tea set");
        assert!(args.is_anonymous);
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        let invalid_inputs = vec![
            "",
            "24.12.2025 10:00",
            "24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00",
        ];

        for input in invalid_inputs {
            assert!(parse_giveaway_command(input).is_err(), "Should reject: {}", input);
        }
    }

    #[test]
    fn test_parse_rejects_bad_dates_and_description() {
        assert!(parse_giveaway_command("tomorrow | 31.12.2025 18:00 | 01.01.2026 12:00 | Prize").is_err());
        assert!(parse_giveaway_command("24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 | ab").is_err());
        assert!(parse_giveaway_command("24.12.2025 10:00 | 31.12.2025 18:00 | 01.01.2026 12:00 |   ").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Headphones").is_ok());
        assert!(validate_description("abc").is_ok());
        assert!(validate_description("ab").is_err());
        assert!(validate_description("   ").is_err());
    }

    #[test]
    fn test_valid_telegram_chat_ids() {
        let valid_ids = vec![
            -1001234567890_i64, // Supergroup
            -123456789,         // Group
            -1,
        ];

        for chat_id in valid_ids {
            assert!(validate_telegram_chat_id(chat_id).is_ok(), "Should accept chat ID: {}", chat_id);
        }
    }

    #[test]
    fn test_invalid_telegram_chat_ids() {
        let invalid_ids = vec![
            0,               // Zero
            123456789,       // Private chat
            -2000000000001, // Out of range
        ];

        for chat_id in invalid_ids {
            assert!(validate_telegram_chat_id(chat_id).is_err(), "Should reject chat ID: {}", chat_id);
        }
    }

    #[test]
    fn test_participate_callback_round_trip() {
        let data = participate_callback_data(42);
        assert_eq!(data, "participate:42");
        assert_eq!(parse_participate_callback(&data), Some(42));
    }

    #[test]
    fn test_participate_callback_rejects_garbage() {
        let invalid = vec![
            "participate:",
            "participate:abc",
            "participate:-5",
            "participate:0",
            "settings:participate:1",
            "42",
        ];

        for data in invalid {
            assert_eq!(parse_participate_callback(data), None, "Should reject: {}", data);
        }
    }
}
