use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base` and resolve `.`/`..` lexically, without touching the filesystem.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    normalize(&base.join(path))
}

pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Render a path the way it appears inside build instructions.
pub fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
