use crate::{DEFAULT_HOME_DIR, DEFAULT_SNAPSHOT_DIR, DEFAULT_SNAPSHOT_PREFIX};
use std::env;
use std::path::PathBuf;

/// Where snapshots live, how they are named, and where they are restored to by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The directory holding one sub-directory per snapshot.
    pub snapshot_dir: PathBuf,
    /// The prefix of every snapshot directory name.
    pub prefix: String,
    /// The base directory a target is restored to when no destination is given.
    pub home_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            home_dir: PathBuf::from(DEFAULT_HOME_DIR),
        }
    }
}

impl Config {
    /// Build a configuration, resolving the home directory from `HOME`.
    pub fn new(snapshot_dir: PathBuf, prefix: &str) -> Self {
        Config {
            snapshot_dir,
            prefix: prefix.to_string(),
            home_dir: home_dir_from_env(),
        }
    }
}

/// Read `HOME`, falling back on `/home` when it is unset or empty.
fn home_dir_from_env() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIR))
}
