#[cfg(test)]
mod tests {
    use devrhythm::libs::window::{active_seconds_in, break_threshold_ms, ActivityWindow, InputBuffer, WindowCache, WINDOW_SECONDS};

    const END: i64 = 10_000_000;
    const START: i64 = END - WINDOW_SECONDS as i64 * 1000;

    #[test]
    fn test_empty_window() {
        assert_eq!(active_seconds_in(Vec::new(), END), 0);
        assert_eq!(active_seconds_in(vec![END - 1000], END), 0);
    }

    #[test]
    fn test_fully_active_window() {
        let inputs: Vec<i64> = (0..=30).map(|k| START + k * 60_000).collect();
        assert_eq!(active_seconds_in(inputs, END), WINDOW_SECONDS);
    }

    #[test]
    fn test_gap_over_threshold_is_not_active() {
        let inputs = vec![START, START + 100_000, START + 500_000, START + 510_000];
        assert_eq!(active_seconds_in(inputs, END), 110);
    }

    #[test]
    fn test_gap_at_threshold_is_active() {
        let inputs = vec![START, START + break_threshold_ms()];
        assert_eq!(active_seconds_in(inputs, END), 300);
    }

    #[test]
    fn test_carry_in_is_clipped_at_window_start() {
        let inputs = vec![START - 100_000, START + 50_000];
        assert_eq!(active_seconds_in(inputs, END), 50);
    }

    #[test]
    fn test_carry_in_over_threshold_is_ignored() {
        let inputs = vec![START - 400_000, START + 50_000];
        assert_eq!(active_seconds_in(inputs, END), 0);
    }

    #[test]
    fn test_no_credit_after_last_input() {
        // Only the closed pair counts; nothing runs from the last input to the end.
        let inputs = vec![END - 200_000, END - 100_000];
        assert_eq!(active_seconds_in(inputs, END), 100);
    }

    #[test]
    fn test_inputs_after_end_are_ignored() {
        let inputs = vec![END - 10_000, END + 20_000];
        assert_eq!(active_seconds_in(inputs, END), 0);
    }

    #[test]
    fn test_sub_second_remainder_is_floored() {
        let inputs = vec![START, START + 1_999];
        assert_eq!(active_seconds_in(inputs, END), 1);
    }

    #[test]
    fn test_buffer_keeps_order() {
        let mut buffer = InputBuffer::default();
        buffer.push(1_000);
        buffer.push(500);
        buffer.push(2_000);
        let stamps: Vec<i64> = buffer.iter().copied().collect();
        assert_eq!(stamps, vec![1_000, 1_000, 2_000]);
    }

    #[test]
    fn test_buffer_drops_old_inputs() {
        let mut window = ActivityWindow::new();
        window.record(0);
        window.record(40 * 60_000 + 1);
        assert_eq!(window.buffer().len(), 1);
    }

    #[test]
    fn test_sample_recomputes_once_per_minute() {
        let base = 600 * 60_000;
        let mut window = ActivityWindow::new();
        window.record(base - 120_000);
        window.record(base - 60_000);

        assert_eq!(window.sample(base + 5_000, true), 60);
        assert_eq!(window.cache().last_bucket, Some(600));

        window.record(base + 10_000);
        assert_eq!(window.sample(base + 20_000, true), 60);
        assert_eq!(window.cache().last_bucket, Some(600));

        assert_eq!(window.sample(base + 61_000, true), 130);
        assert_eq!(window.cache().last_bucket, Some(601));
    }

    #[test]
    fn test_sample_is_zero_until_armed() {
        let base = 600 * 60_000;
        let mut window = ActivityWindow::new();
        window.record(base - 120_000);
        window.record(base - 60_000);
        window.sample(base, true);

        assert_eq!(window.sample(base + 1_000, false), 0);
        assert_eq!(window.cache(), WindowCache::default());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut window = ActivityWindow::new();
        window.record(1_000);
        window.sample(60_000, true);
        window.reset();
        assert!(window.buffer().is_empty());
        assert_eq!(window.cache(), WindowCache::default());
    }
}
