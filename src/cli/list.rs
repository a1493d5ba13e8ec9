use crate::{Handler, Result};
use clap::Args;
use snapshots::SnapshotManager;

/// Arguments for our `ListCommand`.
///
/// Example :
///
/// `snap-manager list --json`
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Print the snapshots as a JSON array.
    #[clap(long)]
    json: bool,
}

impl Handler for ListCommand {
    fn handler(&self, manager: &SnapshotManager) -> Result<()> {
        let snapshots = manager.list()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
            return Ok(());
        }

        println!(
            "Available snapshots in {}:",
            manager.config().snapshot_dir.display()
        );
        if snapshots.is_empty() {
            println!("  No snapshots found.");
        }
        for snapshot in &snapshots {
            println!("  - {}", snapshot);
        }

        Ok(())
    }
}
