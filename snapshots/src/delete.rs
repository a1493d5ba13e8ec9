use crate::{Error, Prompt, Result, SnapshotManager};

/// How a deletion ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { name: String },
    /// The user did not confirm, nothing was touched.
    Cancelled,
}

impl SnapshotManager {
    /// Irreversibly delete a snapshot subvolume.
    ///
    /// The checks run in this order: the snapshot exists, the caller is privileged,
    /// the user confirms. An unprivileged caller is never prompted.
    pub fn delete(&self, name: &str, prompt: &mut dyn Prompt) -> Result<DeleteOutcome> {
        let path = self.snapshot_path(name)?;

        if !self.privileges.is_privileged() {
            return Err(Error::PrivilegeRequired);
        }

        let question = format!(
            "Are you sure you want to delete snapshot '{}'? This action is irreversible.",
            name
        );
        if !prompt.confirm(&question).map_err(Error::Prompt)? {
            return Ok(DeleteOutcome::Cancelled);
        }

        log::info!("Deleting snapshot '{}'...", path.display());

        self.deleter
            .delete_subvolume(&path)
            .map_err(|e| match e {
                toolbox::Error::NotFound { program } => Error::DeleteToolNotFound { program },
                e => Error::DeleteFailed {
                    name: name.to_string(),
                    source: e,
                },
            })?;

        Ok(DeleteOutcome::Deleted {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{
        FailingTool, Fixture, MissingTool, Privileged, RemovingDeleter, ScriptedPrompt,
    };
    use crate::{DeleteOutcome, Error, SnapshotManager};
    use std::fs;

    const SNAP: &str = "home-2023-10-25_10-00-00";

    fn fixture_with_snapshot() -> Fixture {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.root().join(SNAP).join("Documents")).unwrap();
        fixture
    }

    #[test]
    fn test_missing_snapshot_is_checked_first() {
        let fixture = Fixture::new();
        let manager =
            SnapshotManager::new(fixture.config()).with_privileges(Box::new(Privileged(false)));

        let result = manager.delete("home-missing", &mut ScriptedPrompt::answering(true));
        assert!(matches!(result, Err(Error::SnapshotNotFound { name, .. }) if name == "home-missing"));
    }

    #[test]
    fn test_unprivileged_caller_is_never_prompted() {
        let fixture = fixture_with_snapshot();
        let deleter = RemovingDeleter::default();
        let manager = SnapshotManager::new(fixture.config())
            .with_privileges(Box::new(Privileged(false)))
            .with_deleter(Box::new(deleter.clone()));

        for answer in [true, false] {
            let mut prompt = ScriptedPrompt::answering(answer);
            let result = manager.delete(SNAP, &mut prompt);

            assert!(matches!(result, Err(Error::PrivilegeRequired)));
            assert!(prompt.questions.is_empty());
        }
        assert!(fixture.root().join(SNAP).is_dir());
        assert!(deleter.deleted.borrow().is_empty());
    }

    #[test]
    fn test_declined_deletion_keeps_snapshot() {
        let fixture = fixture_with_snapshot();
        let deleter = RemovingDeleter::default();
        let manager = SnapshotManager::new(fixture.config())
            .with_privileges(Box::new(Privileged(true)))
            .with_deleter(Box::new(deleter.clone()));
        let mut prompt = ScriptedPrompt::answering(false);

        let outcome = manager.delete(SNAP, &mut prompt).unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(fixture.root().join(SNAP).is_dir());
        assert!(deleter.deleted.borrow().is_empty());
        assert_eq!(
            prompt.questions,
            vec![format!(
                "Are you sure you want to delete snapshot '{}'? This action is irreversible.",
                SNAP
            )]
        );
    }

    #[test]
    fn test_confirmed_deletion() {
        let fixture = fixture_with_snapshot();
        let deleter = RemovingDeleter::default();
        let manager = SnapshotManager::new(fixture.config())
            .with_privileges(Box::new(Privileged(true)))
            .with_deleter(Box::new(deleter.clone()));

        let outcome = manager
            .delete(SNAP, &mut ScriptedPrompt::answering(true))
            .unwrap();

        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                name: SNAP.to_string()
            }
        );
        assert_eq!(*deleter.deleted.borrow(), vec![fixture.root().join(SNAP)]);
        assert!(!fixture.root().join(SNAP).exists());
    }

    #[test]
    fn test_missing_delete_tool() {
        let fixture = fixture_with_snapshot();
        let manager = SnapshotManager::new(fixture.config())
            .with_privileges(Box::new(Privileged(true)))
            .with_deleter(Box::new(MissingTool("btrfs")));

        let result = manager.delete(SNAP, &mut ScriptedPrompt::answering(true));

        assert!(matches!(result, Err(Error::DeleteToolNotFound { program }) if program == "btrfs"));
        assert!(fixture.root().join(SNAP).is_dir());
    }

    #[test]
    fn test_failing_delete_tool_relays_status() {
        let fixture = fixture_with_snapshot();
        let manager = SnapshotManager::new(fixture.config())
            .with_privileges(Box::new(Privileged(true)))
            .with_deleter(Box::new(FailingTool(19)));

        let error = manager
            .delete(SNAP, &mut ScriptedPrompt::answering(true))
            .unwrap_err();

        assert!(matches!(error, Error::DeleteFailed { .. }));
        assert_eq!(error.exit_code(), 19);
    }
}
