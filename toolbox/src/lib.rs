use std::path::{Path, PathBuf};

pub use btrfs::BtrfsSubvolume;
pub use coreutils::CoreUtils;
pub use privileges::EffectiveUser;
pub use rsync::Rsync;

mod btrfs;
mod command;
mod coreutils;
mod privileges;
mod rsync;

/// External tools related errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program could not be found on the host.
    #[error("Command '{program}' not found. Is it installed and in PATH?")]
    NotFound { program: String },
    /// The program ran but reported a failure.
    #[error("Command '{command}' failed with {}{}", describe_status(.status), describe_stderr(.stderr))]
    Failed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    /// The program could not be spawned or waited on.
    #[error("Command '{program}' could not be executed: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The exit status reported by the tool, if it ran and exited normally.
    pub fn status(&self) -> Option<i32> {
        match self {
            Error::Failed { status, .. } => *status,
            _ => None,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "a signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let stderr = stderr.trim_end();
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\nStderr: {}", stderr)
    }
}

/// A common result type for our toolbox.
pub type Result<T> = std::result::Result<T, Error>;

/// The arguments handed to a `Synchronizer`.
///
/// Trailing separators are significant and must be passed through untouched:
/// a source ending in `/` means "the contents of this directory".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The `Synchronizer` trait copies a path into another one, preserving attributes.
///
/// Implementations must be additive: entries that only exist in the destination are kept.
pub trait Synchronizer {
    fn synchronize(&self, plan: &SyncPlan) -> Result<()>;
}

/// The `SubvolumeDeleter` trait removes a copy-on-write subvolume.
pub trait SubvolumeDeleter {
    fn delete_subvolume(&self, path: &Path) -> Result<()>;
}

/// Generic file operations used to move an item aside.
pub trait FileOps {
    /// Atomically rename `from` to `to`. Fails across filesystems.
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()>;
    /// Copy `from` to `to` recursively, preserving attributes.
    fn copy_preserving(&self, from: &Path, to: &Path) -> Result<()>;
    /// Remove `path`, recursively if it is a directory.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// The `Privileges` trait tells whether the caller holds administrative rights.
pub trait Privileges {
    fn is_privileged(&self) -> bool;
}
