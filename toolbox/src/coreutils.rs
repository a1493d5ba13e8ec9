use crate::command::ToolCommand;
use crate::{FileOps, Result};
use std::fs;
use std::path::Path;

/// `CoreUtils` implements `FileOps` with a `rename` syscall, `cp` and `rm`.
#[derive(Debug, Default, Clone)]
pub struct CoreUtils;

impl FileOps for CoreUtils {
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        fs::rename(from, to)
    }

    fn copy_preserving(&self, from: &Path, to: &Path) -> Result<()> {
        ToolCommand::new("cp")
            .arg("-a")
            .arg(from.as_os_str())
            .arg(to.as_os_str())
            .run()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let flags = if path.is_dir() { "-rf" } else { "-f" };
        ToolCommand::new("rm").arg(flags).arg(path.as_os_str()).run()
    }
}
