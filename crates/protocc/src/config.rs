use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use protocc_core::Versions;
use protocc_exec::docker::DEFAULT_BINARY;

pub const CONFIG_FILE: &str = "protocc.toml";

/// GOPATH of the official golang images.
pub const IMAGE_GOPATH: &str = "/go";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub versions: Versions,
    pub go: GoConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoConfig {
    pub gopath: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub binary: String,
    pub unique_names: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            unique_names: true,
        }
    }
}

impl Config {
    /// Load `explicit` if given (it must exist), else `protocc.toml` in `dir` if present.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = dir.join(CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        Self::read(&path)
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Configured GOPATH, else the host's `go env GOPATH`, else the image default.
    pub fn resolve_gopath(&self) -> String {
        if let Some(gopath) = &self.go.gopath {
            return gopath.clone();
        }
        match host_gopath() {
            Some(gopath) => gopath,
            None => {
                warn!("could not query `go env GOPATH`, using {IMAGE_GOPATH}");
                IMAGE_GOPATH.to_string()
            }
        }
    }
}

fn host_gopath() -> Option<String> {
    let output = Command::new("go").args(["env", "GOPATH"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let gopath = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!gopath.is_empty()).then_some(gopath)
}

pub fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("reading current directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pinned_versions() {
        let config = Config::default();
        assert_eq!(config.versions.protoc, "3.6.1");
        assert_eq!(config.versions.protoc_gen_go, "v1.2.0");
        assert_eq!(config.versions.go, "1.11");
        assert_eq!(config.engine.binary, "docker");
        assert!(config.engine.unique_names);
    }

    #[test]
    fn missing_default_file_means_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(None, tmp.path()).unwrap(), Config::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("other.toml");
        assert!(Config::load(Some(&missing), tmp.path()).is_err());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[versions]\nprotoc = \"3.20.0\"\n\n[go]\ngopath = \"/home/dev/go\"\n\n[engine]\nunique_names = false\n",
        )
        .unwrap();

        let config = Config::load(None, tmp.path()).unwrap();
        assert_eq!(config.versions.protoc, "3.20.0");
        assert_eq!(config.versions.go, "1.11");
        assert_eq!(config.engine.binary, "docker");
        assert!(!config.engine.unique_names);
        assert_eq!(config.resolve_gopath(), "/home/dev/go");
    }

    #[test]
    fn malformed_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "versions = 3").unwrap();

        let err = Config::load(None, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("protocc.toml"));
    }
}
