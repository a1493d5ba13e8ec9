mod delete;
mod list;
mod restore;

use crate::cli::delete::DeleteCommand;
use crate::cli::list::ListCommand;
use crate::cli::restore::RestoreCommand;
use clap::{Args, Parser, Subcommand};
use snapshots::{SnapshotManager, DEFAULT_SNAPSHOT_DIR, DEFAULT_SNAPSHOT_PREFIX};

/// CLI related errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Snapshots(#[from] snapshots::Error),
    /// The listing could not be rendered as JSON
    #[error("Could not serialize snapshots: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// The status our process should exit with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Snapshots(e) => e.exit_code(),
            Error::Serialize(_) => 1,
        }
    }
}

/// A common result type for our CLI.
pub type Result<T> = std::result::Result<T, Error>;

/// `Handler` is a trait that should be implemented for each of our commands.
///
/// It defines the contract & the input / output of a command execution.
pub trait Handler {
    /// Executes the command handler.
    ///
    /// The command arguments are already parsed into the implementor, the manager
    /// carries the configuration shared by every command.
    fn handler(&self, manager: &SnapshotManager) -> Result<()>;
}

#[derive(Parser, Debug)]
#[clap(version, author, about)]
pub struct Cli {
    #[clap(flatten)]
    pub(crate) config: ConfigOpts,
    /// Do not log progress messages.
    #[clap(long, short, global = true)]
    pub(crate) quiet: bool,
    #[clap(subcommand)]
    pub(crate) command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct ConfigOpts {
    /// The directory holding the snapshots.
    #[clap(long, global = true, env = "SNAP_MANAGER_SNAPSHOT_DIR", default_value = DEFAULT_SNAPSHOT_DIR)]
    pub(crate) snapshot_dir: String,
    /// The prefix of snapshot directory names.
    #[clap(long, global = true, env = "SNAP_MANAGER_PREFIX", default_value = DEFAULT_SNAPSHOT_PREFIX)]
    pub(crate) prefix: String,
}

impl Cli {
    /// Get the command used by the user.
    ///
    /// For example, if the user executes the command `list`,
    /// we dynamically return the command so the `main` can
    /// execute it.
    pub fn command(self) -> Box<dyn Handler> {
        match self.command {
            Command::List(cmd) => Box::new(cmd),
            Command::Restore(cmd) => Box::new(cmd),
            Command::Delete(cmd) => Box::new(cmd),
        }
    }
}

/// The enumeration of our commands.
///
/// Each of our commands should be listed in this enumeration with the following format :
/// CommandName(CommandHandler)
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available snapshots
    List(ListCommand),
    /// Restore a file or directory from a snapshot
    #[clap(after_help = "EXAMPLES:
    snap-manager restore home-2023-10-26_12-00-00 Documents/MyFile.txt
    snap-manager restore home-2023-10-26_12-00-00 Documents/MyFolder RestoredFolder/
    snap-manager restore home-2023-10-26_12-00-00 MyFile.txt /tmp/MyRestoredFile.txt")]
    Restore(RestoreCommand),
    /// Delete a snapshot. Requires root privileges
    #[clap(after_help = "EXAMPLE:
    sudo snap-manager delete home-2023-10-25_10-00-00")]
    Delete(DeleteCommand),
}
