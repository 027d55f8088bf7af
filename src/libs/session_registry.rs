//! File-based registry of tracking sessions per physical window.
//!
//! Each running tracker registers one entry under
//! `<root>/<window-key>/<project>-<pid>.session`. Counting the live entries
//! of a window tells whether more than one logical session is bound to it.
//! Entries whose process is gone are removed while counting.

use super::error::{TrackerError, TrackerResult};
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::{Pid, ProcessesToUpdate, System};

const ENTRY_EXTENSION: &str = "session";

/// Environment variables checked, in order, to identify the host window.
const WINDOW_ENV_KEYS: [&str; 4] = ["WINDOWID", "TERM_SESSION_ID", "WT_SESSION", "TMUX_PANE"];
const SSH_TTY_KEY: &str = "SSH_TTY";

/// Identifies the physical window this process runs in.
pub fn detect_window_id() -> String {
    window_id_from(|key| std::env::var(key).ok(), controlling_tty(), parent_pid())
}

/// Resolves the window id from, in order: a terminal-specific environment
/// variable, `$SSH_TTY`, the controlling tty, then the parent process.
/// No fallback is shared between terminals.
pub fn window_id_from<F>(env: F, tty: Option<PathBuf>, parent: Option<u32>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(id) = WINDOW_ENV_KEYS.iter().find_map(|key| non_empty(key)) {
        return id;
    }
    if let Some(tty) = non_empty(SSH_TTY_KEY) {
        return format!("tty{}", tty);
    }
    if let Some(tty) = tty {
        return format!("tty{}", tty.display());
    }
    match parent {
        Some(pid) => format!("console-{}", pid),
        None => format!("console-{}", std::process::id()),
    }
}

/// Terminal device behind stdin, when it is one.
fn controlling_tty() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let target = fs::read_link("/proc/self/fd/0").ok()?;
        let is_terminal = target.starts_with("/dev/pts") || target.to_string_lossy().starts_with("/dev/tty");
        is_terminal.then_some(target)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn parent_pid() -> Option<u32> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid)?.parent().map(|parent| parent.as_u32())
}

/// Keeps window keys and project names safe as path components.
fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Clone)]
pub struct SessionRegistry {
    root: PathBuf,
}

/// A registered session; removes its entry when released.
#[derive(Debug)]
pub struct Registration {
    path: PathBuf,
}

impl Registration {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "session entry already gone");
        }
    }
}

impl SessionRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn window_dir(&self, window_id: &str) -> PathBuf {
        self.root.join(sanitize(window_id))
    }

    fn io_err(&self, path: &Path) -> impl Fn(std::io::Error) -> TrackerError {
        let path = path.to_path_buf();
        move |source| TrackerError::Registry { path: path.clone(), source }
    }

    /// Registers `project` for the current process against `window_id`.
    pub fn register(&self, window_id: &str, project: &str) -> TrackerResult<Registration> {
        let dir = self.window_dir(window_id);
        fs::create_dir_all(&dir).map_err(self.io_err(&dir))?;

        let pid = std::process::id();
        let path = dir.join(format!("{}-{}.{}", sanitize(project), pid, ENTRY_EXTENSION));
        fs::write(&path, pid.to_string()).map_err(self.io_err(&path))?;
        Ok(Registration { path })
    }

    /// Number of live sessions bound to `window_id`, pruning dead entries.
    pub fn live_sessions(&self, window_id: &str) -> TrackerResult<usize> {
        let dir = self.window_dir(window_id);
        if !dir.exists() {
            return Ok(0);
        }

        let mut entries: Vec<(PathBuf, Option<Pid>)> = Vec::new();
        for entry in fs::read_dir(&dir).map_err(self.io_err(&dir))? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let pid = fs::read_to_string(&path)
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .map(Pid::from_u32);
            entries.push((path, pid));
        }

        let mut pids: Vec<Pid> = entries.iter().filter_map(|(_, pid)| *pid).collect();
        pids.sort();
        pids.dedup();
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&pids), true);

        let mut live = 0;
        for (path, pid) in entries {
            match pid {
                Some(pid) if system.process(pid).is_some() => live += 1,
                _ => {
                    tracing::debug!(path = %path.display(), "pruning stale session entry");
                    let _ = fs::remove_file(&path);
                }
            }
        }
        Ok(live)
    }
}
