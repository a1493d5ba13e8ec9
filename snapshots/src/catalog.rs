use crate::{Error, Result, SnapshotManager, SNAPSHOT_TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `Snapshot` holds information about one snapshot directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Snapshot {
    /// The directory name, unique within the snapshot root
    pub name: String,
    /// The snapshot directory
    pub path: PathBuf,
    /// The creation time decoded from the name, if it could be parsed
    pub created: Option<NaiveDateTime>,
}

impl Snapshot {
    fn new(root: &Path, name: &str, prefix: &str) -> Self {
        Snapshot {
            name: name.to_string(),
            path: root.join(name),
            created: parse_creation_time(name, prefix),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.created {
            Some(created) => write!(
                f,
                "{} (Created: {})",
                self.name,
                created.format("%Y-%m-%d %H:%M:%S")
            ),
            None => write!(f, "{} (Could not parse creation time)", self.name),
        }
    }
}

/// Decode the timestamp following `prefix` in a snapshot name.
fn parse_creation_time(name: &str, prefix: &str) -> Option<NaiveDateTime> {
    let timestamp = name.strip_prefix(prefix)?;
    NaiveDateTime::parse_from_str(timestamp, SNAPSHOT_TIMESTAMP_FORMAT).ok()
}

impl SnapshotManager {
    /// List the snapshots found under the snapshot root, sorted by name.
    ///
    /// Only directories whose name starts with the configured prefix are snapshots;
    /// anything else in the root is ignored. As the embedded timestamp is zero-padded
    /// and most significant field first, the name order is also the creation order.
    pub fn list(&self) -> Result<Vec<Snapshot>> {
        let root = &self.config.snapshot_dir;

        let entries = fs::read_dir(root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::DirectoryNotFound(root.clone()),
            ErrorKind::PermissionDenied => Error::PermissionDenied(root.clone()),
            _ if !root.is_dir() => Error::DirectoryNotFound(root.clone()),
            _ => Error::ReadDirectory {
                path: root.clone(),
                source: e,
            },
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::ReadDirectory {
                path: root.clone(),
                source: e,
            })?;

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::debug!("skipping non UTF-8 entry {:?}", name),
            }
        }
        names.sort();

        let snapshots = names
            .iter()
            .filter(|name| name.starts_with(&self.config.prefix))
            .filter(|name| root.join(name).is_dir())
            .map(|name| Snapshot::new(root, name, &self.config.prefix))
            .collect();

        Ok(snapshots)
    }
}
