#[cfg(test)]
mod tests {
    use devrhythm::libs::daemon::StatusPrinter;
    use devrhythm::libs::events::TickEvent;
    use devrhythm::libs::formatter::{activity_percentages, format_duration, format_hm_rounded, format_hms, format_minutes_rounded};
    use devrhythm::libs::messages::Message;
    use std::time::Duration;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(999), "00:00:00");
        assert_eq!(format_hms(3_725_000), "01:02:05");
        assert_eq!(format_hms(123 * 3_600_000), "123:00:00");
    }

    #[test]
    fn test_format_hms_negative_clamped_to_zero() {
        assert_eq!(format_hms(-5_000), "00:00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_duration(&Duration::from_secs(3_661)), "01:01:01");
    }

    #[test]
    fn test_format_hm_rounded() {
        assert_eq!(format_hm_rounded(0), "0min");
        assert_eq!(format_hm_rounded(29_999), "0min");
        assert_eq!(format_hm_rounded(30_000), "1min");
        assert_eq!(format_hm_rounded(7 * 60_000 + 30_000), "8min");
        assert_eq!(format_hm_rounded(3_600_000), "1h 00min");
        assert_eq!(format_hm_rounded(3_930_000), "1h 06min");
        assert_eq!(format_hm_rounded(-60_000), "0min");
    }

    #[test]
    fn test_format_minutes_rounded() {
        assert_eq!(format_minutes_rounded(0), "0min");
        assert_eq!(format_minutes_rounded(89), "1min");
        assert_eq!(format_minutes_rounded(90), "2min");
        assert_eq!(format_minutes_rounded(1800), "30min");
    }

    #[test]
    fn test_activity_percentages() {
        assert_eq!(activity_percentages(0, 0), (0.0, 100.0));
        assert_eq!(activity_percentages(1_000, 250), (25.0, 75.0));
        assert_eq!(activity_percentages(1_000, 5_000), (100.0, 0.0));
    }

    #[test]
    fn test_live_status_message() {
        let message = Message::LiveStatus {
            project_time: "1h 05min".to_string(),
            active_time: "42min".to_string(),
            recent: "12min".to_string(),
            is_idle: false,
        };
        assert_eq!(
            message.to_string(),
            "Project 1h 05min | Active 42min | 12min of last 30 mins | active"
        );
    }

    #[test]
    fn test_status_printer_prints_on_change_only() {
        let tick = |total_project_ms: i64, is_idle: bool| TickEvent {
            total_project_ms,
            total_active_ms: 0,
            is_idle,
            recent_active_secs: 0,
        };
        let mut printer = StatusPrinter::default();

        assert!(printer.on_tick(&tick(1_000, false)));
        assert!(!printer.on_tick(&tick(59_000, false)));
        assert!(printer.on_tick(&tick(59_000, true)));
        assert!(printer.on_tick(&tick(60_000, true)));
        assert!(!printer.on_tick(&tick(61_000, true)));
    }
}
