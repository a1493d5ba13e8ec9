use crate::cli::ConfigOpts;
use snapshots::{Config, SnapshotManager};
use std::env;
use std::path::PathBuf;
use toolbox::{BtrfsSubvolume, Rsync};

/// Overrides the `rsync` binary used to restore items.
const RSYNC_PROGRAM_ENV: &str = "SNAP_MANAGER_RSYNC";
/// Overrides the `btrfs` binary used to delete snapshots.
const BTRFS_PROGRAM_ENV: &str = "SNAP_MANAGER_BTRFS";

/// Create a new snapshot manager instance, backed by `rsync` and `btrfs`
pub fn get_snapshot_manager_instance(opts: &ConfigOpts) -> SnapshotManager {
    let config = Config::new(PathBuf::from(&opts.snapshot_dir), &opts.prefix);

    let rsync = program_override(RSYNC_PROGRAM_ENV)
        .map(|program| Rsync::with_program(&program))
        .unwrap_or_default();
    let btrfs = program_override(BTRFS_PROGRAM_ENV)
        .map(|program| BtrfsSubvolume::with_program(&program))
        .unwrap_or_default();

    SnapshotManager::new(config)
        .with_synchronizer(Box::new(rsync))
        .with_deleter(Box::new(btrfs))
}

fn program_override(name: &str) -> Option<String> {
    env::var(name).ok().filter(|program| !program.is_empty())
}
