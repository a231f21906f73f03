pub mod docker;
pub mod engine;
pub mod error;
pub mod executor;
pub mod naming;
pub mod observer;
pub mod output;
pub mod pipeline;

pub use docker::DockerCli;
pub use engine::{CommandOutput, ContainerEngine, EngineCommand};
pub use error::ExecError;
pub use executor::{Cleanup, Executor, RemoveOutcome};
pub use naming::ArtifactNames;
pub use observer::{CommandObserver, EchoObserver, TracingObserver};
pub use pipeline::{LanguageReport, Pipeline};
