pub mod builder;
pub mod discovery;
pub mod error;
pub mod instruction;
pub mod language;
pub mod path;
pub mod versions;

pub use builder::{BuildContext, InstructionBuilder};
pub use discovery::{discover, discover_for, exclude_segment, ProtoDirs};
pub use error::BuildError;
pub use instruction::{BuildDefinition, ChainLayout, EnvForm, Instruction, RunStep};
pub use language::Language;
pub use versions::Versions;
