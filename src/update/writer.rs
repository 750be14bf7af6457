//! Atomic artifact writes.
//!
//! Every file is staged in a temporary file next to its destination and
//! renamed over it, so the broker never observes a half-written file.
//! [`StagedWrites`] extends this to a whole update: nothing is renamed into
//! place until every file of the batch has been staged, and a rename that
//! fails mid-commit restores the files already replaced.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Permission bits for rendered configuration and certificates.
pub const PUBLIC_MODE: u32 = 0o644;
/// Permission bits for private keys.
pub const PRIVATE_MODE: u32 = 0o600;

/// A staged file could not be moved into place.
#[derive(Debug, Error)]
#[error("failed to replace {}: {source}", .path.display())]
pub struct CommitError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Create a directory and its parents. Succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Replace `path` with `contents` via a temp file in the same directory.
fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let staged = stage_file(path, contents, mode)?;
    staged.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}

fn stage_file(path: &Path, contents: &[u8], mode: u32) -> io::Result<NamedTempFile> {
    if path.is_dir() {
        return Err(io::Error::other("destination is a directory"));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    set_mode(staged.as_file(), mode)?;
    Ok(staged)
}

struct Pending {
    path: PathBuf,
    mode: u32,
    file: NamedTempFile,
}

/// Replaced file and what it held before, for rollback.
struct Replaced {
    path: PathBuf,
    mode: u32,
    previous: Option<Vec<u8>>,
}

/// A set of files replaced together.
///
/// Dropping an uncommitted batch removes its temp files and leaves every
/// destination untouched.
#[derive(Default)]
pub struct StagedWrites {
    pending: Vec<Pending>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to a temp file beside `path`. The destination is
    /// not touched until [`StagedWrites::commit`].
    pub fn stage(&mut self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        let file = stage_file(path, contents, mode)?;
        self.pending.push(Pending {
            path: path.to_path_buf(),
            mode,
            file,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Rename every staged file over its destination, in staging order.
    ///
    /// On failure the destinations already replaced get their previous
    /// contents back, or are removed if they did not exist.
    pub fn commit(self) -> Result<Vec<PathBuf>, CommitError> {
        let mut replaced: Vec<Replaced> = Vec::with_capacity(self.pending.len());

        for Pending { path, mode, file } in self.pending {
            let outcome = read_previous(&path)
                .and_then(|previous| file.persist(&path).map(|_| previous).map_err(|e| e.error));
            match outcome {
                Ok(previous) => replaced.push(Replaced {
                    path,
                    mode,
                    previous,
                }),
                Err(source) => {
                    tracing::error!(path = %path.display(), error = %source, "Commit failed, rolling back");
                    rollback(&replaced);
                    return Err(CommitError { path, source });
                }
            }
        }

        for entry in &replaced {
            tracing::debug!(path = %entry.path.display(), "File written");
        }
        Ok(replaced.into_iter().map(|entry| entry.path).collect())
    }
}

impl std::fmt::Debug for StagedWrites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.pending.iter().map(|p| &p.path))
            .finish()
    }
}

fn read_previous(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn rollback(replaced: &[Replaced]) {
    for entry in replaced.iter().rev() {
        let restored = match &entry.previous {
            Some(bytes) => write_atomic(&entry.path, bytes, entry.mode),
            None => fs::remove_file(&entry.path),
        };
        if let Err(e) = restored {
            tracing::error!(path = %entry.path.display(), error = %e, "Failed to restore file");
        }
    }
}

#[cfg(unix)]
fn set_mode(file: &fs::File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _mode: u32) -> io::Result<()> {
    Ok(())
}
