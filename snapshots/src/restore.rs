use crate::{Error, Prompt, Result, SnapshotManager, BACKUP_TIMESTAMP_FORMAT};
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use toolbox::SyncPlan;

/// What to restore, from which snapshot, and optionally where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreRequest {
    /// The snapshot directory name
    pub snapshot: String,
    /// The item path relative to the snapshot, without leading or trailing separators
    pub target: String,
    /// The explicit destination, taken literally
    pub destination: Option<PathBuf>,
}

impl RestoreRequest {
    pub fn new(snapshot: &str, target: &str, destination: Option<PathBuf>) -> Self {
        RestoreRequest {
            snapshot: snapshot.to_string(),
            target: target.trim_matches('/').to_string(),
            destination,
        }
    }
}

/// How a restore ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The item was copied from `source` into `destination`.
    Restored {
        source: PathBuf,
        destination: PathBuf,
        /// Where the previous destination was moved to, if it existed
        backup: Option<PathBuf>,
    },
    /// The user refused to overwrite the existing destination.
    Cancelled,
}

impl SnapshotManager {
    /// Restore a file or a directory from a snapshot.
    ///
    /// Without an explicit destination the item goes back to its place under the home
    /// directory. An item already there is only overwritten once the user confirms, and
    /// after it has been moved aside to `<destination>.original.<timestamp>`.
    ///
    /// Restoring a directory merges its contents into the destination: entries only
    /// present in the destination are kept.
    pub fn restore(
        &self,
        request: &RestoreRequest,
        prompt: &mut dyn Prompt,
    ) -> Result<RestoreOutcome> {
        let snapshot_dir = self.snapshot_path(&request.snapshot)?;
        let source = self.source_path(&snapshot_dir, request)?;

        let (destination, backup) = match &request.destination {
            Some(destination) => {
                prepare_explicit_destination(&source, destination)?;
                (destination.clone(), None)
            }
            None => {
                // The whole snapshot has no original location short of the home itself
                if request.target.is_empty() {
                    return Err(Error::EmptyTarget {
                        snapshot: request.snapshot.clone(),
                    });
                }

                let destination = self.config.home_dir.join(&request.target);
                create_parent(&destination)?;

                let backup = if exists(&destination) {
                    let question = format!(
                        "'{}' already exists. Overwrite and backup original?",
                        destination.display()
                    );
                    if !prompt.confirm(&question).map_err(Error::Prompt)? {
                        return Ok(RestoreOutcome::Cancelled);
                    }
                    Some(self.backup(&destination)?)
                } else {
                    None
                };

                (destination, backup)
            }
        };

        log::info!(
            "Restoring '{}' to '{}'...",
            source.display(),
            destination.display()
        );

        let plan = sync_plan(&source, &destination);
        self.synchronizer
            .synchronize(&plan)
            .map_err(|e| match e {
                toolbox::Error::NotFound { program } => Error::CopyToolNotFound { program },
                e => Error::CopyFailed(e),
            })?;

        Ok(RestoreOutcome::Restored {
            source,
            destination,
            backup,
        })
    }

    /// Resolve the restore target within the snapshot.
    ///
    /// An empty target is the whole snapshot.
    fn source_path(&self, snapshot_dir: &Path, request: &RestoreRequest) -> Result<PathBuf> {
        if request.target.is_empty() {
            return Ok(snapshot_dir.to_path_buf());
        }

        let source = snapshot_dir.join(&request.target);
        if !exists(&source) {
            return Err(Error::TargetNotFoundInSnapshot {
                target: request.target.clone(),
                snapshot: request.snapshot.clone(),
            });
        }

        Ok(source)
    }

    /// Move `destination` aside, and return where it went.
    ///
    /// A rename is tried first. When it fails, for example across filesystems, the item is
    /// copied then removed. If the copy fails the original is left as is.
    fn backup(&self, destination: &Path) -> Result<PathBuf> {
        let backup = available_backup_path(destination, Local::now());
        log::info!(
            "Backing up existing '{}' to '{}'...",
            destination.display(),
            backup.display()
        );

        if let Err(e) = self.file_ops.rename(destination, &backup) {
            log::warn!(
                "Could not move original to backup location with a rename: {}. Trying copy+delete.",
                e
            );

            let backup_error = |source| Error::Backup {
                path: destination.to_path_buf(),
                source,
            };
            self.file_ops
                .copy_preserving(destination, &backup)
                .map_err(backup_error)?;
            self.file_ops.remove(destination).map_err(backup_error)?;
        }

        Ok(backup)
    }
}

/// Reject impossible explicit destinations, then create the directories they need.
///
/// A destination ending with a separator is a directory and is created itself,
/// otherwise only its parent is.
fn prepare_explicit_destination(source: &Path, destination: &Path) -> Result<()> {
    if source.is_dir() && exists(destination) && !destination.is_dir() {
        return Err(Error::DirectoryOverNonDirectory {
            destination: destination.to_path_buf(),
            source_dir: source.to_path_buf(),
        });
    }

    if has_trailing_separator(destination) {
        create_dir(destination)
    } else {
        create_parent(destination)
    }
}

/// Build the synchronizer arguments for copying `source` to `destination`.
///
/// A directory source gets a trailing separator so that its contents are copied rather
/// than the directory itself. So does an existing destination directory, so that they
/// land inside it.
pub(crate) fn sync_plan(source: &Path, destination: &Path) -> SyncPlan {
    if source.is_dir() {
        let destination = if destination.is_dir() {
            with_trailing_separator(destination)
        } else {
            destination.to_path_buf()
        };

        SyncPlan {
            source: with_trailing_separator(source),
            destination,
        }
    } else {
        SyncPlan {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        }
    }
}

/// `<destination>.original.<YYYYMMDDHHMMSS>`
pub(crate) fn backup_path(destination: &Path, now: DateTime<Local>) -> PathBuf {
    let mut backup = OsString::from(destination.as_os_str());
    backup.push(".original.");
    backup.push(now.format(BACKUP_TIMESTAMP_FORMAT).to_string());
    PathBuf::from(backup)
}

/// `backup_path`, with a `.N` suffix when a backup taken in the same second is in the way.
pub(crate) fn available_backup_path(destination: &Path, now: DateTime<Local>) -> PathBuf {
    let backup = backup_path(destination, now);
    let mut candidate = backup.clone();
    let mut suffix = 1;
    while exists(&candidate) {
        let mut name = OsString::from(backup.as_os_str());
        name.push(format!(".{}", suffix));
        candidate = PathBuf::from(name);
        suffix += 1;
    }
    candidate
}

/// True for anything present at `path`, including dangling symlinks.
fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn has_trailing_separator(path: &Path) -> bool {
    path.as_os_str().as_bytes().ends_with(b"/")
}

fn with_trailing_separator(path: &Path) -> PathBuf {
    if has_trailing_separator(path) {
        return path.to_path_buf();
    }
    let mut path = OsString::from(path.as_os_str());
    path.push("/");
    PathBuf::from(path)
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

fn create_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    log::debug!("creating directory {}", path.display());
    fs::create_dir_all(path).map_err(|e| Error::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}
