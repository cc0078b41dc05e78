//! Crash-resilient single-instance guard for the distillation stage.

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    process,
};

use anyhow::Context;

/// Process-scoped lock token. Holding a `RunGuard` means this process owns
/// the stage; dropping it releases the token on every exit path.
#[derive(Debug)]
pub struct RunGuard {
    path: PathBuf,
}

impl RunGuard {
    /// Tries to take ownership of the token at `path`.
    ///
    /// Returns `Ok(None)` when another live process holds the token — the
    /// caller should exit without doing any work. A token naming a dead
    /// process, the caller itself, or unreadable contents is stale and is
    /// taken over.
    pub fn acquire(path: impl Into<PathBuf>) -> anyhow::Result<Option<RunGuard>> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create guard directory {}", parent.display())
                })?;
            }
        }

        // two tries: one to acquire, one more after clearing a stale token
        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    write!(file, "{}", process::id()).with_context(|| {
                        format!("Failed to write guard token {}", path.display())
                    })?;
                    return Ok(Some(RunGuard { path }));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    let holder = fs::read_to_string(&path)
                        .ok()
                        .and_then(|s| s.trim().parse::<u32>().ok());

                    match holder {
                        Some(pid) if pid != process::id() && process_alive(pid) => {
                            tracing::error!(
                                holder_pid = pid,
                                "Another distillation instance is already running"
                            );
                            return Ok(None);
                        }
                        _ => {
                            tracing::warn!(path = %path.display(), "Removing stale guard token");
                            if let Err(err) = fs::remove_file(&path) {
                                // a concurrent holder may have removed it first
                                if err.kind() != ErrorKind::NotFound {
                                    return Err(err).with_context(|| {
                                        format!(
                                            "Failed to remove stale guard token {}",
                                            path.display()
                                        )
                                    });
                                }
                            }
                        }
                    }
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("Failed to create guard token {}", path.display())
                    });
                }
            }
        }

        // lost the takeover race; treat the token as held
        Ok(None)
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(error = ?err, path = %self.path.display(), "Failed to release guard token");
        }
    }
}

/// Liveness probe for the recorded holder pid.
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("distillation.lock")
    }

    #[test]
    fn test_acquire_writes_own_pid_and_drop_releases() {
        let dir = tempfile::tempdir().unwrap();
        let path = token_path(&dir);

        let guard = RunGuard::acquire(&path).unwrap().expect("token was free");
        let recorded = fs::read_to_string(&path).unwrap();
        assert_eq!(recorded.trim(), process::id().to_string());

        drop(guard);
        assert!(!path.exists(), "token should be released on drop");
    }

    #[test]
    fn test_live_foreign_holder_blocks_acquisition() {
        let dir = tempfile::tempdir().unwrap();
        let path = token_path(&dir);

        // pid 1 is always alive and never the test process
        fs::write(&path, "1").unwrap();

        assert!(RunGuard::acquire(&path).unwrap().is_none());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1",
            "foreign token must not be touched"
        );
    }

    #[test]
    fn test_stale_token_is_taken_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = token_path(&dir);

        // far beyond any real pid namespace
        fs::write(&path, "999999999").unwrap();

        let guard = RunGuard::acquire(&path).unwrap();
        assert!(guard.is_some(), "dead holder should be evicted");
        assert_eq!(
            fs::read_to_string(&path).unwrap().trim(),
            process::id().to_string()
        );
    }

    #[test]
    fn test_own_pid_token_is_taken_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = token_path(&dir);

        fs::write(&path, process::id().to_string()).unwrap();

        assert!(RunGuard::acquire(&path).unwrap().is_some());
    }

    #[test]
    fn test_unreadable_token_is_taken_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = token_path(&dir);

        fs::write(&path, "not-a-pid").unwrap();

        assert!(RunGuard::acquire(&path).unwrap().is_some());
    }
}
