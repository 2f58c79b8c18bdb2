//! Best-effort removal of a session's temp files

use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::errors::CleanupError;
use crate::utils::temp::Session;

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<CleanupError>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ResourceJanitor;

impl ResourceJanitor {
    /// Removes every existing slot of `session`. Each slot is attempted
    /// independently; failures are logged and reported, never returned as
    /// errors. Missing files are skipped, so repeated sweeps are no-ops.
    pub fn sweep(session: &Session) -> CleanupReport {
        let mut report = CleanupReport::default();

        for path in session.slots() {
            match path.try_exists() {
                Ok(false) => continue,
                Ok(true) => {}
                Err(source) => {
                    report.failures.push(CleanupError {
                        path: path.to_path_buf(),
                        source,
                    });
                    continue;
                }
            }

            match std::fs::remove_file(path) {
                Ok(()) => {
                    debug!("Removed temp file {}", path.display());
                    report.removed.push(path.to_path_buf());
                }
                // Already gone between the check and the removal
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => report.failures.push(CleanupError {
                    path: path.to_path_buf(),
                    source,
                }),
            }
        }

        for failure in &report.failures {
            warn!("Cleanup error for session {}: {}", session.id(), failure);
        }

        report
    }
}

/// Scoped owner of a [`Session`]. Cleanup runs once: on [`SessionGuard::release`]
/// at the terminal state, or on drop if the run was abandoned before that.
pub struct SessionGuard {
    session: Session,
    released: bool,
}

impl SessionGuard {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            released: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn release(mut self) -> CleanupReport {
        self.released = true;
        let report = ResourceJanitor::sweep(&self.session);
        info!(
            "Session {} cleaned up: {} file(s) removed, {} failure(s)",
            self.session.id(),
            report.removed.len(),
            report.failures.len()
        );
        report
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                "Session {} abandoned before completion, cleaning up",
                self.session.id()
            );
            // Drop cannot await; three unlinks are short enough to block on
            let _ = ResourceJanitor::sweep(&self.session);
        }
    }
}
