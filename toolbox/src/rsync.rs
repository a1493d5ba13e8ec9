use crate::command::ToolCommand;
use crate::{Result, SyncPlan, Synchronizer};

const RSYNC_PROGRAM: &str = "rsync";

/// `Rsync` synchronizes paths with `rsync -a`.
///
/// No `--delete` is ever passed: restoring into an existing directory merges.
#[derive(Debug, Clone)]
pub struct Rsync {
    program: String,
}

impl Default for Rsync {
    fn default() -> Self {
        Rsync {
            program: RSYNC_PROGRAM.to_string(),
        }
    }
}

impl Rsync {
    /// Use another binary than the `rsync` found in `PATH`.
    pub fn with_program(program: &str) -> Self {
        Rsync {
            program: program.to_string(),
        }
    }

    fn command(&self, plan: &SyncPlan) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg("-a")
            .arg(plan.source.as_os_str())
            .arg(plan.destination.as_os_str())
    }
}

impl Synchronizer for Rsync {
    fn synchronize(&self, plan: &SyncPlan) -> Result<()> {
        self.command(plan).run()
    }
}
