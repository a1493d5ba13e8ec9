use std::path::{Component, Path, PathBuf};
use toolbox::{
    BtrfsSubvolume, CoreUtils, EffectiveUser, FileOps, Privileges, Rsync, SubvolumeDeleter,
    Synchronizer,
};

pub use catalog::Snapshot;
pub use config::Config;
pub use confirm::{Confirmation, Prompt};
pub use delete::DeleteOutcome;
pub use restore::{RestoreOutcome, RestoreRequest};

mod catalog;
mod config;
mod confirm;
mod delete;
mod restore;

/// The directory holding the home snapshots on a default installation.
pub const DEFAULT_SNAPSHOT_DIR: &str = "/home/.snapshots";
/// Every snapshot directory name starts with this prefix, followed by its creation time.
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "home-";
/// Used as the restore base when `HOME` is not set.
pub const DEFAULT_HOME_DIR: &str = "/home";

/// The timestamp embedded in snapshot names, e.g. `2023-10-26_12-00-00`.
pub(crate) const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
/// The timestamp appended to backups, e.g. `20231026120000`.
pub(crate) const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The snapshot root does not exist
    #[error("Snapshot directory {} not found.", .0.display())]
    DirectoryNotFound(PathBuf),
    /// The snapshot root exists but cannot be read
    #[error("Permission denied accessing {}.", .0.display())]
    PermissionDenied(PathBuf),
    /// Any other failure while enumerating the snapshot root
    #[error("Could not read {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// No snapshot directory with this name under the snapshot root
    #[error("Snapshot '{name}' not found or is not a directory in {}.", .root.display())]
    SnapshotNotFound { name: String, root: PathBuf },
    /// The whole snapshot was requested without an explicit destination
    #[error("Restoring all of snapshot '{snapshot}' needs an explicit destination.")]
    EmptyTarget { snapshot: String },
    /// The restore target does not exist within the snapshot
    #[error("Target path '{target}' not found within snapshot '{snapshot}'.")]
    TargetNotFoundInSnapshot { target: String, snapshot: String },
    /// A directory would have to replace an existing file
    #[error("Cannot overwrite non-directory '{}' with directory '{}'.", .destination.display(), .source_dir.display())]
    DirectoryOverNonDirectory {
        destination: PathBuf,
        source_dir: PathBuf,
    },
    /// Deleting a snapshot needs administrative privileges
    #[error("Deleting snapshots requires root privileges. Please run with sudo.")]
    PrivilegeRequired,
    /// A destination directory could not be created
    #[error("Could not create directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The existing destination could not be backed up; nothing was restored
    #[error("Failed to backup '{}': {source}. Aborting restore.", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: toolbox::Error,
    },
    /// The file synchronizer is not installed
    #[error("Command '{program}' not found. Is it installed and in PATH?")]
    CopyToolNotFound { program: String },
    /// The file synchronizer failed
    #[error("Restore failed. {0}")]
    CopyFailed(#[source] toolbox::Error),
    /// The subvolume deletion tool is not installed
    #[error("Command '{program}' not found. Is btrfs-progs installed?")]
    DeleteToolNotFound { program: String },
    /// The subvolume deletion tool failed
    #[error("Failed to delete snapshot '{name}'. {source}")]
    DeleteFailed {
        name: String,
        #[source]
        source: toolbox::Error,
    },
    /// The confirmation prompt could not be displayed or read
    #[error("Could not read confirmation: {0}")]
    Prompt(#[source] std::io::Error),
}

impl Error {
    /// The process exit status matching this error.
    ///
    /// A delegated tool that exited with its own status hands it over, everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CopyFailed(source) | Error::DeleteFailed { source, .. } => {
                source.status().filter(|code| *code != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}

/// A common result type for our crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The `SnapshotManager` lists, restores from and deletes the snapshots found under
/// the configured snapshot root.
///
/// It never caches anything: every operation reads the filesystem again. The external
/// tools it relies on are injected, and default to their process-backed implementations.
pub struct SnapshotManager {
    config: Config,
    synchronizer: Box<dyn Synchronizer>,
    deleter: Box<dyn SubvolumeDeleter>,
    file_ops: Box<dyn FileOps>,
    privileges: Box<dyn Privileges>,
}

impl SnapshotManager {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            synchronizer: Box::new(Rsync::default()),
            deleter: Box::new(BtrfsSubvolume::default()),
            file_ops: Box::new(CoreUtils),
            privileges: Box::new(EffectiveUser),
        }
    }

    pub fn with_synchronizer(mut self, synchronizer: Box<dyn Synchronizer>) -> Self {
        self.synchronizer = synchronizer;
        self
    }

    pub fn with_deleter(mut self, deleter: Box<dyn SubvolumeDeleter>) -> Self {
        self.deleter = deleter;
        self
    }

    pub fn with_file_ops(mut self, file_ops: Box<dyn FileOps>) -> Self {
        self.file_ops = file_ops;
        self
    }

    pub fn with_privileges(mut self, privileges: Box<dyn Privileges>) -> Self {
        self.privileges = privileges;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a snapshot name to its directory.
    ///
    /// The name must be a single path component naming an existing directory under the root.
    fn snapshot_path(&self, name: &str) -> Result<PathBuf> {
        let not_found = || Error::SnapshotNotFound {
            name: name.to_string(),
            root: self.config.snapshot_dir.clone(),
        };

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(not_found()),
        }

        let path = self.config.snapshot_dir.join(name);
        if !path.is_dir() {
            return Err(not_found());
        }

        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{Config, Error, Prompt, SnapshotManager};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempdir::TempDir;
    use toolbox::{FileOps, Privileges, SubvolumeDeleter, SyncPlan, Synchronizer};

    /// A temporary snapshot root and home directory.
    pub struct Fixture {
        pub dir: TempDir,
    }

    impl Fixture {
        pub fn new() -> Self {
            let dir = TempDir::new("snapshots").unwrap();
            fs::create_dir_all(dir.path().join("snapshots")).unwrap();
            fs::create_dir_all(dir.path().join("home")).unwrap();
            Fixture { dir }
        }

        pub fn root(&self) -> PathBuf {
            self.dir.path().join("snapshots")
        }

        pub fn home(&self) -> PathBuf {
            self.dir.path().join("home")
        }

        pub fn config(&self) -> Config {
            Config {
                snapshot_dir: self.root(),
                prefix: "home-".to_string(),
                home_dir: self.home(),
            }
        }

        /// Write a file at `relative` inside the snapshot `name`, creating the snapshot.
        pub fn snapshot_file(&self, name: &str, relative: &str, content: &str) -> PathBuf {
            let path = self.root().join(name).join(relative);
            write(&path, content);
            path
        }
    }

    pub fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Answers prompts from a script, and records the questions asked.
    #[derive(Default)]
    pub struct ScriptedPrompt {
        pub answers: VecDeque<bool>,
        pub questions: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn answering(answer: bool) -> Self {
            ScriptedPrompt {
                answers: VecDeque::from(vec![answer]),
                questions: vec![],
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
            self.questions.push(question.to_string());
            Ok(self.answers.pop_front().unwrap_or(false))
        }
    }

    /// A synchronizer copying files in-process, following rsync's trailing separator rules.
    #[derive(Clone, Default)]
    pub struct CopyingSynchronizer {
        pub plans: Rc<RefCell<Vec<SyncPlan>>>,
    }

    impl Synchronizer for CopyingSynchronizer {
        fn synchronize(&self, plan: &SyncPlan) -> toolbox::Result<()> {
            self.plans.borrow_mut().push(plan.clone());
            let source = plan.source.to_string_lossy();
            if source.ends_with('/') {
                copy_tree(&plan.source, &plan.destination);
            } else if plan.destination.is_dir() {
                let name = plan.source.file_name().unwrap();
                fs::copy(&plan.source, plan.destination.join(name)).unwrap();
            } else {
                fs::copy(&plan.source, &plan.destination).unwrap();
            }
            Ok(())
        }
    }

    fn copy_tree(from: &Path, to: &Path) {
        fs::create_dir_all(to).unwrap();
        for entry in fs::read_dir(from).unwrap() {
            let entry = entry.unwrap();
            let target = to.join(entry.file_name());
            if entry.path().is_dir() {
                copy_tree(&entry.path(), &target);
            } else {
                fs::copy(entry.path(), target).unwrap();
            }
        }
    }

    /// A synchronizer or deleter behaving as if its binary were missing.
    pub struct MissingTool(pub &'static str);

    impl Synchronizer for MissingTool {
        fn synchronize(&self, _plan: &SyncPlan) -> toolbox::Result<()> {
            Err(toolbox::Error::NotFound {
                program: self.0.to_string(),
            })
        }
    }

    impl SubvolumeDeleter for MissingTool {
        fn delete_subvolume(&self, _path: &Path) -> toolbox::Result<()> {
            Err(toolbox::Error::NotFound {
                program: self.0.to_string(),
            })
        }
    }

    /// A synchronizer or deleter whose tool always exits with `status`.
    pub struct FailingTool(pub i32);

    impl FailingTool {
        fn error(&self) -> toolbox::Error {
            toolbox::Error::Failed {
                command: "tool".to_string(),
                status: Some(self.0),
                stderr: "tool failed".to_string(),
            }
        }
    }

    impl Synchronizer for FailingTool {
        fn synchronize(&self, _plan: &SyncPlan) -> toolbox::Result<()> {
            Err(self.error())
        }
    }

    impl SubvolumeDeleter for FailingTool {
        fn delete_subvolume(&self, _path: &Path) -> toolbox::Result<()> {
            Err(self.error())
        }
    }

    /// A deleter removing the directory in-process.
    #[derive(Clone, Default)]
    pub struct RemovingDeleter {
        pub deleted: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl SubvolumeDeleter for RemovingDeleter {
        fn delete_subvolume(&self, path: &Path) -> toolbox::Result<()> {
            self.deleted.borrow_mut().push(path.to_path_buf());
            fs::remove_dir_all(path).unwrap();
            Ok(())
        }
    }

    /// File operations on plain files, each step able to fail on demand.
    #[derive(Clone, Default)]
    pub struct FlakyFileOps {
        pub rename_fails: bool,
        pub copy_fails: bool,
        pub remove_fails: bool,
        pub calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl FlakyFileOps {
        fn failure(command: &str) -> toolbox::Error {
            toolbox::Error::Failed {
                command: command.to_string(),
                status: Some(1),
                stderr: "No space left on device".to_string(),
            }
        }
    }

    impl FileOps for FlakyFileOps {
        fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
            self.calls.borrow_mut().push("rename");
            if self.rename_fails {
                return Err(std::io::Error::from_raw_os_error(18));
            }
            fs::rename(from, to)
        }

        fn copy_preserving(&self, from: &Path, to: &Path) -> toolbox::Result<()> {
            self.calls.borrow_mut().push("copy");
            if self.copy_fails {
                return Err(Self::failure("cp"));
            }
            fs::copy(from, to).unwrap();
            Ok(())
        }

        fn remove(&self, path: &Path) -> toolbox::Result<()> {
            self.calls.borrow_mut().push("remove");
            if self.remove_fails {
                return Err(Self::failure("rm"));
            }
            fs::remove_file(path).unwrap();
            Ok(())
        }
    }

    pub struct Privileged(pub bool);

    impl Privileges for Privileged {
        fn is_privileged(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_snapshot_path_rejects_nested_names() {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.root().join("home-a").join("b")).unwrap();
        let manager = SnapshotManager::new(fixture.config());

        assert!(manager.snapshot_path("home-a").is_ok());
        assert!(matches!(
            manager.snapshot_path("home-a/b"),
            Err(Error::SnapshotNotFound { .. })
        ));
        assert!(matches!(
            manager.snapshot_path(".."),
            Err(Error::SnapshotNotFound { .. })
        ));
    }

    #[test]
    fn test_snapshot_path_rejects_files() {
        let fixture = Fixture::new();
        write(&fixture.root().join("home-file"), "not a snapshot");
        let manager = SnapshotManager::new(fixture.config());

        assert!(matches!(
            manager.snapshot_path("home-file"),
            Err(Error::SnapshotNotFound { .. })
        ));
    }

    #[test]
    fn test_exit_code_relays_tool_status() {
        let failed = toolbox::Error::Failed {
            command: "btrfs subvolume delete x".to_string(),
            status: Some(12),
            stderr: String::new(),
        };
        let error = Error::DeleteFailed {
            name: "home-x".to_string(),
            source: failed,
        };
        assert_eq!(error.exit_code(), 12);
        assert_eq!(Error::PrivilegeRequired.exit_code(), 1);
        assert_eq!(
            Error::CopyToolNotFound {
                program: "rsync".to_string()
            }
            .exit_code(),
            1
        );
    }
}
