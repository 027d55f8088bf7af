#[cfg(test)]
mod tests {
    use devrhythm::libs::clock::{Clock, ManualClock};
    use devrhythm::libs::conflict::{ConflictCheck, ConflictMonitor};
    use devrhythm::libs::engine::{EngineHandle, EngineSettings};
    use devrhythm::libs::error::TrackerResult;
    use devrhythm::libs::events::EngineEvent;
    use devrhythm::libs::ledger::Ledger;
    use devrhythm::libs::status::TrackingStatus;
    use devrhythm::libs::tracker::{Tracker, TrackerOptions};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::broadcast;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    struct EngineTestContext {
        temp_dir: TempDir,
        clock: Arc<ManualClock>,
    }

    impl AsyncTestContext for EngineTestContext {
        async fn setup() -> Self {
            EngineTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                clock: Arc::new(ManualClock::starting_at_millis(600 * 60_000)),
            }
        }

        async fn teardown(self) {}
    }

    impl EngineTestContext {
        fn ledger(&self) -> Ledger {
            Ledger::new(self.temp_dir.path().join(Ledger::file_name("alice", "backend")))
        }

        fn tracker(&self) -> Arc<Tracker> {
            let clock: Arc<dyn Clock> = self.clock.clone();
            Arc::new(Tracker::new(
                TrackerOptions {
                    user: "alice".to_string(),
                    project: "backend".to_string(),
                    ledger: self.ledger(),
                    status: TrackingStatus::Enabled,
                },
                clock,
            ))
        }
    }

    fn fast_settings() -> EngineSettings {
        EngineSettings {
            tick_interval: Duration::from_millis(10),
            conflict_interval: Duration::from_millis(20),
            input_queue: 16,
        }
    }

    /// Reports a conflict once `armed` is set.
    struct SwitchCheck(Arc<AtomicBool>);

    impl ConflictCheck for SwitchCheck {
        fn name(&self) -> &'static str {
            "switch"
        }

        fn detect(&self) -> TrackerResult<Option<String>> {
            Ok(self.0.load(Ordering::SeqCst).then(|| "second project attached".to_string()))
        }
    }

    async fn next_matching<F>(events: &mut broadcast::Receiver<EngineEvent>, mut pred: F) -> EngineEvent
    where
        F: FnMut(&EngineEvent) -> bool,
    {
        timeout(WAIT, async {
            loop {
                match events.recv().await {
                    Ok(event) if pred(&event) => return event,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
                }
            }
        })
        .await
        .expect("timed out waiting for engine event")
    }

    #[test_context(EngineTestContext)]
    #[tokio::test]
    async fn test_ticks_are_published(ctx: &mut EngineTestContext) {
        let engine = EngineHandle::start(ctx.tracker(), ConflictMonitor::new(), fast_settings());
        let mut events = engine.subscribe();

        for _ in 0..3 {
            next_matching(&mut events, |e| matches!(e, EngineEvent::Tick(_))).await;
        }

        assert!(engine.shutdown().await);
        assert_eq!(ctx.ledger().entries().unwrap().len(), 1);
    }

    #[test_context(EngineTestContext)]
    #[tokio::test]
    async fn test_inputs_reach_the_classifier(ctx: &mut EngineTestContext) {
        let engine = EngineHandle::start(ctx.tracker(), ConflictMonitor::new(), fast_settings());
        let sender = engine.input_sender();
        let mut events = engine.subscribe();

        assert!(sender.send().await);
        next_matching(&mut events, |e| matches!(e, EngineEvent::Input(_))).await;
        ctx.clock.advance(Duration::from_secs(5));
        assert!(sender.send().await);
        next_matching(&mut events, |e| matches!(e, EngineEvent::Input(_))).await;

        assert_eq!(engine.tracker().snapshot().current_session, Duration::from_secs(5));
        assert!(engine.shutdown().await);

        let entries = ctx.ledger().entries().unwrap();
        assert_eq!(entries[0].active_time, Duration::from_secs(5));
        assert_eq!(entries[0].sessions, 1);
    }

    #[test_context(EngineTestContext)]
    #[tokio::test]
    async fn test_queued_inputs_count_at_shutdown(ctx: &mut EngineTestContext) {
        let settings = EngineSettings {
            tick_interval: Duration::from_secs(3600),
            conflict_interval: Duration::from_secs(3600),
            input_queue: 16,
        };
        let engine = EngineHandle::start(ctx.tracker(), ConflictMonitor::new(), settings);
        let sender = engine.input_sender();

        // Queued without yielding, so the drain task has not seen them yet.
        assert!(sender.try_send());
        ctx.clock.advance(Duration::from_secs(5));
        assert!(sender.try_send());
        assert!(engine.shutdown().await);

        let entries = ctx.ledger().entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].active_time, Duration::from_secs(5));
        assert_eq!(entries[0].sessions, 1);
    }

    #[test_context(EngineTestContext)]
    #[tokio::test]
    async fn test_conflict_disables_and_writes_once(ctx: &mut EngineTestContext) {
        let tripped = Arc::new(AtomicBool::new(false));
        let monitor = ConflictMonitor::new().with_check(SwitchCheck(tripped.clone()));
        let tracker = ctx.tracker();
        let mut events = tracker.subscribe();
        let engine = EngineHandle::start(tracker.clone(), monitor, fast_settings());
        let sender = engine.input_sender();

        sender.send().await;
        tripped.store(true, Ordering::SeqCst);
        let event = next_matching(&mut events, |e| matches!(e, EngineEvent::Disabled { .. })).await;
        assert_eq!(
            event,
            EngineEvent::Disabled {
                reason: "second project attached".to_string()
            }
        );
        assert!(tracker.is_disabled());

        let before = tracker.snapshot();
        for _ in 0..1000 {
            sender.try_send();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(tracker.snapshot(), before);
        assert!(tracker.tick().is_none());

        assert!(!engine.shutdown().await);
        assert_eq!(ctx.ledger().entries().unwrap().len(), 1);
    }

    #[test_context(EngineTestContext)]
    #[tokio::test]
    async fn test_manual_conflict_check(ctx: &mut EngineTestContext) {
        let tripped = Arc::new(AtomicBool::new(false));
        let monitor = ConflictMonitor::new().with_check(SwitchCheck(tripped.clone()));
        let settings = EngineSettings {
            conflict_interval: Duration::from_secs(3600),
            ..fast_settings()
        };
        let engine = EngineHandle::start(ctx.tracker(), monitor, settings);

        assert_eq!(engine.check_conflicts().await, None);
        // Let the poll task's immediate first check pass before flipping.
        tokio::time::sleep(Duration::from_millis(50)).await;
        tripped.store(true, Ordering::SeqCst);
        let conflict = engine.check_conflicts().await.unwrap();
        assert_eq!(conflict.check, "switch");
        assert_eq!(engine.check_conflicts().await, None);

        assert!(!engine.shutdown().await);
    }

    #[test_context(EngineTestContext)]
    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking(ctx: &mut EngineTestContext) {
        let settings = EngineSettings {
            input_queue: 1,
            ..fast_settings()
        };
        let engine = EngineHandle::start(ctx.tracker(), ConflictMonitor::new(), settings);
        let sender = engine.input_sender();

        let accepted = (0..100).filter(|_| sender.try_send()).count();
        assert!(accepted >= 1);
        assert!(engine.shutdown().await);
    }

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
        assert_eq!(settings.conflict_interval, Duration::from_secs(30));
        assert_eq!(settings.input_queue, 1024);
    }
}
