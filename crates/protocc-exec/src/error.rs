use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no output language selected")]
    NoLanguageSelected,
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write build definition to `{command}`: {source}")]
    Stdin {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("image build failed for {tag} (exit status {code:?})")]
    BuildFailed { tag: String, code: Option<i32> },
    #[error("container {name} exited with status {code:?}")]
    RunFailed { name: String, code: Option<i32> },
    #[error("container output is not valid UTF-8: {0}")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
    #[error("copying {path} out of container {container} failed (exit status {code:?})")]
    CopyFailed {
        container: String,
        path: PathBuf,
        code: Option<i32>,
    },
    #[error("removing {target} failed (exit status {code:?})")]
    RemoveFailed { target: String, code: Option<i32> },
    #[error("build definition error: {0}")]
    Build(#[from] protocc_core::BuildError),
}
