use std::path::PathBuf;

use crate::ExecError;

/// One blocking call against a docker-compatible engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Build `tag` from a Dockerfile fed on stdin, with `context` as build context.
    Build {
        tag: String,
        context: PathBuf,
        definition: String,
    },
    RemoveContainer { name: String },
    /// Run `image` as container `name`, capturing its stdout.
    Run { name: String, image: String },
    /// Copy `path` out of `container` to `dest` on the host.
    CopyOut {
        container: String,
        path: PathBuf,
        dest: PathBuf,
    },
    RemoveImage { tag: String },
}

impl EngineCommand {
    pub fn args(&self) -> Vec<String> {
        match self {
            EngineCommand::Build { tag, context, .. } => vec![
                "build".into(),
                "-t".into(),
                tag.clone(),
                "-f".into(),
                "-".into(),
                context.to_string_lossy().into_owned(),
            ],
            EngineCommand::RemoveContainer { name } => vec!["rm".into(), name.clone()],
            EngineCommand::Run { name, image } => {
                vec!["run".into(), "--name".into(), name.clone(), image.clone()]
            }
            EngineCommand::CopyOut {
                container,
                path,
                dest,
            } => vec![
                "cp".into(),
                format!("{container}:{}", path.to_string_lossy()),
                dest.to_string_lossy().into_owned(),
            ],
            EngineCommand::RemoveImage { tag } => vec!["rmi".into(), tag.clone()],
        }
    }

    /// Data written to the process's stdin, if any.
    pub fn stdin(&self) -> Option<&str> {
        match self {
            EngineCommand::Build { definition, .. } => Some(definition),
            _ => None,
        }
    }

    pub fn captures_stdout(&self) -> bool {
        matches!(self, EngineCommand::Run { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout. Empty unless the command captures it.
    pub stdout: Vec<u8>,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            stdout: Vec::new(),
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<Vec<u8>>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait ContainerEngine {
    /// Executable name shown to the operator.
    fn program(&self) -> &str;

    fn execute(&self, command: &EngineCommand) -> Result<CommandOutput, ExecError>;

    fn command_line(&self, command: &EngineCommand) -> String {
        let mut line = self.program().to_string();
        for arg in command.args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}
