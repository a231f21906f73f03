use serde::{Deserialize, Serialize};

pub const PROTOC_VERSION: &str = "3.6.1";
pub const PROTOC_GEN_GO_VERSION: &str = "v1.2.0";
pub const GO_VERSION: &str = "1.11";

/// Pinned toolchain versions baked into the build definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Versions {
    pub protoc: String,
    pub protoc_gen_go: String,
    pub go: String,
}

impl Default for Versions {
    fn default() -> Self {
        Self {
            protoc: PROTOC_VERSION.to_string(),
            protoc_gen_go: PROTOC_GEN_GO_VERSION.to_string(),
            go: GO_VERSION.to_string(),
        }
    }
}
