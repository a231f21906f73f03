use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{BuildError, Language};

pub const PROTO_SUFFIX: &str = ".proto";

/// Directories that directly contain at least one `.proto` file.
///
/// Paths are relative to the walk root and spelled `.` / `./a/b`, matching how
/// the build context sees them. Order is a pre-order walk with siblings sorted
/// by name, so it is stable for a given tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoDirs {
    dirs: Vec<PathBuf>,
}

impl ProtoDirs {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }
}

/// Walk `root` and collect every directory with a direct `.proto` child.
pub fn discover(root: &Path) -> Result<ProtoDirs, BuildError> {
    let mut dirs = Vec::new();
    walk(root, PathBuf::from("."), &mut dirs)?;
    debug!(root = %root.display(), count = dirs.len(), "discovered proto directories");
    Ok(ProtoDirs { dirs })
}

/// Discovery plus the language's vendored-tree exclusion, if it has one.
pub fn discover_for(language: Language, root: &Path) -> Result<ProtoDirs, BuildError> {
    let dirs = discover(root)?;
    Ok(match language.vendored_segment() {
        Some(segment) => exclude_segment(dirs, segment),
        None => dirs,
    })
}

/// Drop every directory that has `segment` as one of its path components.
pub fn exclude_segment(dirs: ProtoDirs, segment: &str) -> ProtoDirs {
    let (kept, dropped): (Vec<_>, Vec<_>) = dirs
        .dirs
        .into_iter()
        .partition(|dir| !dir.components().any(|c| c.as_os_str() == segment));
    for dir in &dropped {
        debug!(dir = %dir.display(), segment, "skipping vendored proto directory");
    }
    ProtoDirs { dirs: kept }
}

fn walk(dir: &Path, rel: PathBuf, out: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut has_proto = false;
    let mut subdirs = Vec::new();
    for entry in entries {
        let ft = entry.file_type()?;
        let name = entry.file_name();
        if ft.is_dir() {
            subdirs.push(name);
        } else if ft.is_symlink() && points_to_dir(&entry.path()) {
            // Symlinked directories are neither followed nor counted as files.
        } else if name.to_string_lossy().ends_with(PROTO_SUFFIX) {
            has_proto = true;
        }
    }

    if has_proto {
        out.push(rel.clone());
    }
    for name in subdirs {
        walk(&dir.join(&name), rel.join(&name), out)?;
    }
    Ok(())
}

fn points_to_dir(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
