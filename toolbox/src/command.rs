use crate::{Error, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::Stdio;

/// Implementation of an external tool invocation.
///
/// The tool inherits our standard output, while its standard error is captured
/// so it can be relayed inside the returned error when the tool fails.
#[derive(Debug, Clone)]
pub(crate) struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: &str) -> Self {
        ToolCommand {
            program: program.to_string(),
            args: vec![],
        }
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Get the arguments given to the program.
    #[cfg(test)]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Execute the command and block until it completes.
    pub fn run(&self) -> Result<()> {
        log::info!("Executing: {}", self);

        let output = std::process::Command::from(self)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::NotFound {
                    program: self.program.clone(),
                },
                _ => Error::Io {
                    program: self.program.clone(),
                    source: e,
                },
            })?;

        if !output.status.success() {
            return Err(Error::Failed {
                command: self.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

impl From<&ToolCommand> for std::process::Command {
    fn from(origin: &ToolCommand) -> Self {
        let mut command = std::process::Command::new(&origin.program);
        command.args(&origin.args);

        command
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
