//! Detection of two tracking sessions sharing one physical window.
//!
//! Each heuristic is an independent [`ConflictCheck`]. The
//! [`ConflictMonitor`] ORs them together; the latch and the final ledger
//! write live in the tracker, so new heuristics plug in here without
//! touching either.

use super::error::{TrackerError, TrackerResult};
use super::session_registry::SessionRegistry;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// Default marker directory identifying a project root.
pub const DEFAULT_ROOT_MARKER: &str = ".idea";

/// One independent conflict heuristic.
pub trait ConflictCheck: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Some(reason)` when the condition holds.
    fn detect(&self) -> TrackerResult<Option<String>>;
}

/// A tripped check and its explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub check: &'static str,
    pub reason: String,
}

/// More than one live logical session is registered against this window.
pub struct SharedWindowCheck {
    registry: SessionRegistry,
    window_id: String,
}

impl SharedWindowCheck {
    pub fn new(registry: SessionRegistry, window_id: impl Into<String>) -> Self {
        Self {
            registry,
            window_id: window_id.into(),
        }
    }
}

impl ConflictCheck for SharedWindowCheck {
    fn name(&self) -> &'static str {
        "shared-window"
    }

    fn detect(&self) -> TrackerResult<Option<String>> {
        let live = self.registry.live_sessions(&self.window_id)?;
        Ok((live >= 2).then(|| format!("{} projects are attached to window `{}`", live, self.window_id)))
    }
}

/// More than one distinct project root marker is discoverable.
///
/// Candidates are the tracked root, its immediate subdirectories and any
/// extra content roots.
pub struct ProjectRootsCheck {
    tracked_root: PathBuf,
    content_roots: Vec<PathBuf>,
    marker: String,
}

impl ProjectRootsCheck {
    pub fn new(tracked_root: impl Into<PathBuf>, content_roots: Vec<PathBuf>, marker: impl Into<String>) -> Self {
        Self {
            tracked_root: tracked_root.into(),
            content_roots,
            marker: marker.into(),
        }
    }

    fn candidates(&self) -> TrackerResult<Vec<PathBuf>> {
        let mut candidates = vec![self.tracked_root.clone()];
        if self.tracked_root.is_dir() {
            let children = fs::read_dir(&self.tracked_root).map_err(|e| TrackerError::Check {
                check: self.name(),
                reason: format!("cannot list {}: {}", self.tracked_root.display(), e),
            })?;
            candidates.extend(children.filter_map(|entry| entry.ok()).map(|entry| entry.path()).filter(|p| p.is_dir()));
        }
        candidates.extend(self.content_roots.iter().cloned());
        Ok(candidates)
    }

    /// Distinct roots carrying the marker directory.
    pub fn marked_roots(&self) -> TrackerResult<BTreeSet<PathBuf>> {
        Ok(self
            .candidates()?
            .into_iter()
            .filter(|root| root.join(&self.marker).is_dir())
            .map(|root| fs::canonicalize(&root).unwrap_or(root))
            .collect())
    }
}

impl ConflictCheck for ProjectRootsCheck {
    fn name(&self) -> &'static str {
        "multiple-project-roots"
    }

    fn detect(&self) -> TrackerResult<Option<String>> {
        let roots = self.marked_roots()?;
        Ok((roots.len() >= 2).then(|| {
            let listed: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
            format!("multiple project roots found: {}", listed.join(", "))
        }))
    }
}

/// Evaluates every registered check, first hit wins.
#[derive(Default)]
pub struct ConflictMonitor {
    checks: Vec<Box<dyn ConflictCheck>>,
}

impl ConflictMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check(mut self, check: impl ConflictCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn push(&mut self, check: Box<dyn ConflictCheck>) {
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// A failing check counts as "no conflict".
    pub fn evaluate(&self) -> Option<Conflict> {
        self.checks.iter().find_map(|check| match check.detect() {
            Ok(Some(reason)) => Some(Conflict { check: check.name(), reason }),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(check = check.name(), error = %e, "conflict check failed");
                None
            }
        })
    }
}
