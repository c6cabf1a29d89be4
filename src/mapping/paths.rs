use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root or a drive prefix.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a compiler-printed path against the directory the compiler ran in.
pub fn resolve(reported: impl AsRef<Path>, base: &Path) -> PathBuf {
    let reported = reported.as_ref();
    if reported.is_absolute() {
        normalize(reported)
    } else {
        normalize(&base.join(reported))
    }
}

/// Component-wise prefix test, so `/ws2/a.go` is not inside `/ws`.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}
