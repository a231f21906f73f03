use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::engine::{CommandOutput, ContainerEngine, EngineCommand};
use crate::ExecError;

pub const DEFAULT_BINARY: &str = "docker";

/// Drives the `docker` CLI (or a compatible binary such as `podman`).
///
/// Build logs, stderr, and the output of `rm`/`cp` go straight to the terminal;
/// only `run` has its stdout captured.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl ContainerEngine for DockerCli {
    fn program(&self) -> &str {
        &self.binary
    }

    fn execute(&self, command: &EngineCommand) -> Result<CommandOutput, ExecError> {
        let line = self.command_line(command);
        let spawn_err = |source| ExecError::Spawn {
            command: line.clone(),
            source,
        };

        let mut cmd = Command::new(&self.binary);
        cmd.args(command.args());
        cmd.stdin(if command.stdin().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(if command.captures_stdout() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        let mut child = cmd.spawn().map_err(spawn_err)?;
        let mut written = Ok(());
        if let Some(input) = command.stdin() {
            if let Some(mut stdin) = child.stdin.take() {
                written = stdin.write_all(input.as_bytes());
                // stdin is closed here so the engine sees EOF
            }
        }

        // Always reap the child; a write error only matters if the engine
        // claims success without having read the whole definition.
        let output = child.wait_with_output().map_err(spawn_err)?;
        debug!(command = %line, code = ?output.status.code(), "engine command finished");
        if let Err(source) = written {
            if output.status.success() {
                return Err(ExecError::Stdin {
                    command: line,
                    source,
                });
            }
            debug!(command = %line, error = %source, "engine stopped reading stdin");
        }
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
        })
    }
}
