use std::path::{Path, PathBuf};

use protocc_core::BuildDefinition;
use tracing::{info, warn};

use crate::engine::{CommandOutput, ContainerEngine, EngineCommand};
use crate::naming::ArtifactNames;
use crate::observer::CommandObserver;
use crate::output::parse_output_paths;
use crate::ExecError;

/// Whether a failed removal aborts the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    BestEffort,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Best-effort removal did not happen, e.g. because nothing by that name existed.
    Skipped { code: Option<i32> },
}

/// Builds an image from a definition, runs it once, and copies the reported files back.
pub struct Executor<'a> {
    engine: &'a dyn ContainerEngine,
    observer: &'a dyn CommandObserver,
    names: ArtifactNames,
    context: PathBuf,
}

impl<'a> Executor<'a> {
    pub fn new(
        engine: &'a dyn ContainerEngine,
        observer: &'a dyn CommandObserver,
        names: ArtifactNames,
    ) -> Self {
        Self {
            engine,
            observer,
            names,
            context: PathBuf::from("."),
        }
    }

    /// Build context passed to the engine; `.` (the working directory) by default.
    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    /// Run all phases and return the paths copied back to the host.
    ///
    /// Once the image is built, the container is removed on every exit path:
    /// required on success, best-effort when an earlier phase failed.
    pub fn execute(&self, definition: &BuildDefinition) -> Result<Vec<PathBuf>, ExecError> {
        self.build(definition)?;

        let guard = CleanupGuard::new(self);
        self.remove_container(Cleanup::BestEffort)?;

        let files = self.run()?;
        for file in &files {
            self.copy_back(file)?;
        }

        guard.finish()?;
        info!(files = files.len(), "copied generated files");
        Ok(files)
    }

    pub fn build(&self, definition: &BuildDefinition) -> Result<(), ExecError> {
        let command = EngineCommand::Build {
            tag: self.names.image.clone(),
            context: self.context.clone(),
            definition: definition.render(),
        };
        let output = self.call(&command)?;
        if !output.succeeded() {
            return Err(ExecError::BuildFailed {
                tag: self.names.image.clone(),
                code: output.code,
            });
        }
        info!(image = %self.names.image, "built image");
        Ok(())
    }

    /// Run the container and return the file paths it reports on stdout.
    pub fn run(&self) -> Result<Vec<PathBuf>, ExecError> {
        let command = EngineCommand::Run {
            name: self.names.container.clone(),
            image: self.names.image.clone(),
        };
        let output = self.call(&command)?;
        let stdout = String::from_utf8(output.stdout)?;
        self.observer.on_output(stdout.trim());

        if output.code != Some(0) {
            return Err(ExecError::RunFailed {
                name: self.names.container.clone(),
                code: output.code,
            });
        }
        Ok(parse_output_paths(&stdout))
    }

    /// Copy `path` out of the container to the identical host path.
    pub fn copy_back(&self, path: &Path) -> Result<(), ExecError> {
        let command = EngineCommand::CopyOut {
            container: self.names.container.clone(),
            path: path.to_path_buf(),
            dest: path.to_path_buf(),
        };
        let output = self.call(&command)?;
        if !output.succeeded() {
            return Err(ExecError::CopyFailed {
                container: self.names.container.clone(),
                path: path.to_path_buf(),
                code: output.code,
            });
        }
        Ok(())
    }

    pub fn remove_container(&self, cleanup: Cleanup) -> Result<RemoveOutcome, ExecError> {
        let command = EngineCommand::RemoveContainer {
            name: self.names.container.clone(),
        };
        self.remove(&command, &self.names.container, cleanup)
    }

    /// Remove this invocation's image. A no-op for shared image tags.
    pub fn remove_image(&self, cleanup: Cleanup) -> Result<RemoveOutcome, ExecError> {
        if !self.names.ephemeral_image {
            return Ok(RemoveOutcome::Skipped { code: None });
        }
        let command = EngineCommand::RemoveImage {
            tag: self.names.image.clone(),
        };
        self.remove(&command, &self.names.image, cleanup)
    }

    fn remove(
        &self,
        command: &EngineCommand,
        artifact: &str,
        cleanup: Cleanup,
    ) -> Result<RemoveOutcome, ExecError> {
        let code = match self.call(command) {
            Ok(output) if output.succeeded() => return Ok(RemoveOutcome::Removed),
            Ok(output) => output.code,
            Err(err) if cleanup == Cleanup::BestEffort => {
                warn!(artifact, error = %err, "ignoring failed removal");
                None
            }
            Err(err) => return Err(err),
        };
        match cleanup {
            Cleanup::BestEffort => Ok(RemoveOutcome::Skipped { code }),
            Cleanup::Required => Err(ExecError::RemoveFailed {
                target: artifact.to_string(),
                code,
            }),
        }
    }

    fn call(&self, command: &EngineCommand) -> Result<CommandOutput, ExecError> {
        self.observer.on_command(&self.engine.command_line(command));
        self.engine.execute(command)
    }
}

/// Removes the container (and an ephemeral image) if dropped before `finish`.
struct CleanupGuard<'e, 'a> {
    executor: &'e Executor<'a>,
    armed: bool,
}

impl<'e, 'a> CleanupGuard<'e, 'a> {
    fn new(executor: &'e Executor<'a>) -> Self {
        Self {
            executor,
            armed: true,
        }
    }

    fn finish(mut self) -> Result<(), ExecError> {
        self.armed = false;
        let removed = self.executor.remove_container(Cleanup::Required);
        let _ = self.executor.remove_image(Cleanup::BestEffort);
        removed.map(|_| ())
    }
}

impl Drop for CleanupGuard<'_, '_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.executor.remove_container(Cleanup::BestEffort);
            let _ = self.executor.remove_image(Cleanup::BestEffort);
        }
    }
}
