use crate::Privileges;
use nix::unistd::geteuid;

/// `EffectiveUser` considers the process privileged when it runs with an effective UID of 0.
#[derive(Debug, Default, Clone)]
pub struct EffectiveUser;

impl Privileges for EffectiveUser {
    fn is_privileged(&self) -> bool {
        geteuid().is_root()
    }
}
