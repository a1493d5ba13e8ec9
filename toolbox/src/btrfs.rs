use crate::command::ToolCommand;
use crate::{Result, SubvolumeDeleter};
use std::path::Path;

const BTRFS_PROGRAM: &str = "btrfs";

/// `BtrfsSubvolume` drives `btrfs subvolume` sub-commands.
#[derive(Debug, Clone)]
pub struct BtrfsSubvolume {
    program: String,
}

impl Default for BtrfsSubvolume {
    fn default() -> Self {
        BtrfsSubvolume {
            program: BTRFS_PROGRAM.to_string(),
        }
    }
}

impl BtrfsSubvolume {
    /// Use another binary than the `btrfs` found in `PATH`.
    pub fn with_program(program: &str) -> Self {
        BtrfsSubvolume {
            program: program.to_string(),
        }
    }

    fn delete_command(&self, path: &Path) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg("subvolume")
            .arg("delete")
            .arg(path.as_os_str())
    }
}

impl SubvolumeDeleter for BtrfsSubvolume {
    fn delete_subvolume(&self, path: &Path) -> Result<()> {
        self.delete_command(path).run()
    }
}

#[cfg(test)]
mod tests {
    use super::BtrfsSubvolume;
    use crate::{Error, SubvolumeDeleter};
    use std::path::Path;

    #[test]
    fn test_delete_command() {
        let command = BtrfsSubvolume::default().delete_command(Path::new("/home/.snapshots/home-1"));
        assert_eq!(
            command.to_string(),
            "btrfs subvolume delete /home/.snapshots/home-1"
        );
    }

    #[test]
    fn test_missing_btrfs() {
        let result = BtrfsSubvolume::with_program("/nonexistent/bin/btrfs")
            .delete_subvolume(Path::new("/tmp"));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }
}
