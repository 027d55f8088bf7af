#[cfg(test)]
mod tests {
    use devrhythm::libs::conflict::{ConflictCheck, ConflictMonitor, ProjectRootsCheck, SharedWindowCheck, DEFAULT_ROOT_MARKER};
    use devrhythm::libs::error::{TrackerError, TrackerResult};
    use devrhythm::libs::session_registry::{window_id_from, SessionRegistry};
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConflictTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ConflictTestContext {
        fn setup() -> Self {
            ConflictTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl ConflictTestContext {
        fn project_dir(&self, relative: &str, marked: bool) -> PathBuf {
            let dir = self.temp_dir.path().join(relative);
            fs::create_dir_all(&dir).unwrap();
            if marked {
                fs::create_dir_all(dir.join(DEFAULT_ROOT_MARKER)).unwrap();
            }
            dir
        }

        fn registry(&self) -> SessionRegistry {
            SessionRegistry::new(self.temp_dir.path().join("sessions"))
        }
    }

    struct FixedCheck(Option<&'static str>);

    impl ConflictCheck for FixedCheck {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&self) -> TrackerResult<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct FailingCheck;

    impl ConflictCheck for FailingCheck {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn detect(&self) -> TrackerResult<Option<String>> {
            Err(TrackerError::Check {
                check: "failing",
                reason: "unavailable".to_string(),
            })
        }
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_single_root_is_fine(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("app", true);
        ctx.project_dir("app/src", false);

        let check = ProjectRootsCheck::new(&root, Vec::new(), DEFAULT_ROOT_MARKER);
        assert_eq!(check.marked_roots().unwrap().len(), 1);
        assert_eq!(check.detect().unwrap(), None);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_unmarked_root_is_fine(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("plain", false);
        let check = ProjectRootsCheck::new(&root, Vec::new(), DEFAULT_ROOT_MARKER);
        assert!(check.marked_roots().unwrap().is_empty());
        assert_eq!(check.detect().unwrap(), None);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_nested_marked_root_conflicts(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("app", true);
        ctx.project_dir("app/plugin", true);

        let check = ProjectRootsCheck::new(&root, Vec::new(), DEFAULT_ROOT_MARKER);
        let reason = check.detect().unwrap().unwrap();
        assert!(reason.contains("multiple project roots"));
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_only_immediate_children_are_scanned(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("app", true);
        ctx.project_dir("app/deep/nested", true);

        let check = ProjectRootsCheck::new(&root, Vec::new(), DEFAULT_ROOT_MARKER);
        assert_eq!(check.detect().unwrap(), None);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_marked_content_root_conflicts(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("app", true);
        let other = ctx.project_dir("elsewhere", true);

        let check = ProjectRootsCheck::new(&root, vec![other], DEFAULT_ROOT_MARKER);
        assert!(check.detect().unwrap().is_some());
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_duplicate_roots_count_once(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("app", true);
        let same = root.join("..").join("app");

        let check = ProjectRootsCheck::new(&root, vec![root.clone(), same], DEFAULT_ROOT_MARKER);
        assert_eq!(check.marked_roots().unwrap().len(), 1);
        assert_eq!(check.detect().unwrap(), None);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_custom_marker(ctx: &mut ConflictTestContext) {
        let root = ctx.project_dir("app", true);
        fs::create_dir_all(root.join("sub").join(".vscode")).unwrap();

        let idea = ProjectRootsCheck::new(&root, Vec::new(), DEFAULT_ROOT_MARKER);
        assert_eq!(idea.detect().unwrap(), None);

        fs::create_dir_all(root.join(".vscode")).unwrap();
        let vscode = ProjectRootsCheck::new(&root, Vec::new(), ".vscode");
        assert!(vscode.detect().unwrap().is_some());
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_registry_counts_live_sessions(ctx: &mut ConflictTestContext) {
        let registry = ctx.registry();
        assert_eq!(registry.live_sessions("w1").unwrap(), 0);

        let alpha = registry.register("w1", "alpha").unwrap();
        assert!(alpha.path().exists());
        assert_eq!(registry.live_sessions("w1").unwrap(), 1);

        let beta = registry.register("w1", "beta").unwrap();
        assert_eq!(registry.live_sessions("w1").unwrap(), 2);
        assert_eq!(registry.live_sessions("w2").unwrap(), 0);

        drop(beta);
        assert_eq!(registry.live_sessions("w1").unwrap(), 1);
        drop(alpha);
        assert_eq!(registry.live_sessions("w1").unwrap(), 0);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_registry_prunes_dead_entries(ctx: &mut ConflictTestContext) {
        let registry = ctx.registry();
        let _live = registry.register("w1", "alpha").unwrap();

        let window_dir = ctx.temp_dir.path().join("sessions").join("w1");
        let ghost = window_dir.join("ghost-4294967295.session");
        let garbage = window_dir.join("garbage-1.session");
        fs::write(&ghost, "4294967295").unwrap();
        fs::write(&garbage, "not a pid").unwrap();

        assert_eq!(registry.live_sessions("w1").unwrap(), 1);
        assert!(!ghost.exists());
        assert!(!garbage.exists());
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_registry_sanitizes_window_ids(ctx: &mut ConflictTestContext) {
        let registry = ctx.registry();
        let registration = registry.register("../../escape", "my/project").unwrap();
        assert!(registration.path().starts_with(ctx.temp_dir.path().join("sessions")));
        assert_eq!(registry.live_sessions("../../escape").unwrap(), 1);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_registry_counts_entries_sharing_a_pid(ctx: &mut ConflictTestContext) {
        let registry = ctx.registry();
        let _sessions: Vec<_> = ["alpha", "beta", "gamma"]
            .iter()
            .map(|project| registry.register("w1", project).unwrap())
            .collect();
        assert_eq!(registry.live_sessions("w1").unwrap(), 3);
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_window_id_prefers_terminal_variables() {
        let env = env_of(&[("TMUX_PANE", "%3"), ("WT_SESSION", ""), ("TERM_SESSION_ID", "abc"), ("SSH_TTY", "/dev/pts/9")]);
        assert_eq!(window_id_from(env, Some(PathBuf::from("/dev/pts/1")), Some(42)), "abc");
    }

    #[test]
    fn test_window_id_falls_back_to_ssh_tty() {
        let env = env_of(&[("WINDOWID", "  "), ("SSH_TTY", "/dev/pts/9")]);
        assert_eq!(window_id_from(env, Some(PathBuf::from("/dev/pts/1")), Some(42)), "tty/dev/pts/9");
    }

    #[test]
    fn test_window_id_falls_back_to_controlling_tty() {
        let first = window_id_from(env_of(&[]), Some(PathBuf::from("/dev/pts/1")), Some(42));
        let second = window_id_from(env_of(&[]), Some(PathBuf::from("/dev/pts/2")), Some(42));
        assert_eq!(first, "tty/dev/pts/1");
        assert_ne!(first, second);
    }

    #[test]
    fn test_window_id_falls_back_to_parent_process() {
        let first = window_id_from(env_of(&[]), None, Some(42));
        let second = window_id_from(env_of(&[]), None, Some(43));
        assert_eq!(first, "console-42");
        assert_ne!(first, second);
        assert_eq!(window_id_from(env_of(&[]), None, None), format!("console-{}", std::process::id()));
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_plain_consoles_do_not_share_a_window(ctx: &mut ConflictTestContext) {
        let registry = ctx.registry();
        let first = window_id_from(env_of(&[]), None, Some(100));
        let second = window_id_from(env_of(&[]), None, Some(200));

        let _alpha = registry.register(&first, "alpha").unwrap();
        let _beta = registry.register(&second, "beta").unwrap();
        assert_eq!(SharedWindowCheck::new(registry.clone(), first).detect().unwrap(), None);
        assert_eq!(SharedWindowCheck::new(registry, second).detect().unwrap(), None);
    }

    #[test_context(ConflictTestContext)]
    #[test]
    fn test_shared_window_check(ctx: &mut ConflictTestContext) {
        let registry = ctx.registry();
        let check = SharedWindowCheck::new(registry.clone(), "w1");

        let _alpha = registry.register("w1", "alpha").unwrap();
        assert_eq!(check.detect().unwrap(), None);

        let _beta = registry.register("w1", "beta").unwrap();
        let reason = check.detect().unwrap().unwrap();
        assert!(reason.contains("w1"));
    }

    #[test]
    fn test_monitor_first_hit_wins() {
        let monitor = ConflictMonitor::new()
            .with_check(FixedCheck(None))
            .with_check(FailingCheck)
            .with_check(FixedCheck(Some("first")))
            .with_check(FixedCheck(Some("second")));
        assert_eq!(monitor.len(), 4);

        let conflict = monitor.evaluate().unwrap();
        assert_eq!(conflict.check, "fixed");
        assert_eq!(conflict.reason, "first");
    }

    #[test]
    fn test_monitor_errors_are_not_conflicts() {
        let mut monitor = ConflictMonitor::new();
        assert!(monitor.is_empty());
        monitor.push(Box::new(FailingCheck));
        assert_eq!(monitor.evaluate(), None);
    }
}
