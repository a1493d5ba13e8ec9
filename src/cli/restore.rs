use crate::{Handler, Result};
use clap::Args;
use snapshots::{Confirmation, RestoreOutcome, RestoreRequest, SnapshotManager};
use std::path::PathBuf;

/// Arguments for our `RestoreCommand`.
///
/// These arguments are parsed by `clap` and an instance of `RestoreCommand` containing
/// arguments is provided.
///
/// Example :
///
/// `snap-manager restore home-2023-10-26_12-00-00 Documents/MyFile.txt`
///
/// The `handler` method provided below will be executed.
#[derive(Debug, Args)]
pub struct RestoreCommand {
    /// Name of the snapshot (e.g., home-YYYY-MM-DD_HH-MM-SS)
    snapshot_name: String,
    /// Relative path of the file/directory within the snapshot to restore
    target_path: String,
    /// Path to restore to. If omitted, restores to the original location in the home
    /// directory, backing up existing items
    destination_path: Option<String>,
}

impl Handler for RestoreCommand {
    fn handler(&self, manager: &SnapshotManager) -> Result<()> {
        let request = RestoreRequest::new(
            &self.snapshot_name,
            &self.target_path,
            self.destination_path.as_ref().map(PathBuf::from),
        );

        match manager.restore(&request, &mut Confirmation::stdio())? {
            RestoreOutcome::Cancelled => println!("Restore cancelled by user."),
            RestoreOutcome::Restored { backup, .. } => {
                if let Some(backup) = backup {
                    println!("Original backed up to '{}'.", backup.display());
                }
                println!("Restore successful.");
            }
        }

        Ok(())
    }
}
