use std::path::{Component, Path, PathBuf};

/// Joins a request path onto the site root, refusing anything that would land
/// outside it. `..` is resolved lexically, and for paths that exist symlinks are
/// followed before the final containment check.
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if let Ok(real) = resolved.canonicalize() {
        let real_root = root.canonicalize().ok()?;
        if !real.starts_with(&real_root) {
            return None;
        }
    }
    Some(resolved)
}
