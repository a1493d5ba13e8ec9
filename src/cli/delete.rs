use crate::{Handler, Result};
use clap::Args;
use snapshots::{Confirmation, DeleteOutcome, SnapshotManager};

/// Arguments for our `DeleteCommand`.
///
/// Example :
///
/// `sudo snap-manager delete home-2023-10-25_10-00-00`
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Name of the snapshot to delete
    snapshot_name: String,
}

impl Handler for DeleteCommand {
    fn handler(&self, manager: &SnapshotManager) -> Result<()> {
        match manager.delete(&self.snapshot_name, &mut Confirmation::stdio())? {
            DeleteOutcome::Cancelled => println!("Deletion cancelled by user."),
            DeleteOutcome::Deleted { name } => {
                println!("Snapshot '{}' deleted successfully.", name)
            }
        }

        Ok(())
    }
}
