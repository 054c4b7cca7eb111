use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base` and lexically normalize the result.
///
/// An absolute `path` replaces `base`; `.` segments are dropped and
/// `..` segments pop the previous segment without touching the file system.
pub fn join_normalized<B: AsRef<Path>, P: AsRef<Path>>(
    base: B,
    path: P,
) -> PathBuf {
    normalize(&base.as_ref().join(path.as_ref()))
}

/// Lexically normalize a path.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
