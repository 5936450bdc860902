//! Path normalization utilities.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Convert a relative path to a forward-slash string.
///
/// Used for zip entry names and URLs, which are `/`-separated on every
/// platform regardless of the host path separator.
pub fn to_slash_string(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

/// First normal component of a relative path, if any.
///
/// `node_modules/pkg/index.js` -> `Some("node_modules")`
pub fn first_component(path: &Path) -> Option<String> {
    path.components().find_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_to_slash_string() {
        assert_eq!(
            to_slash_string(Path::new("assets/css/screen.css")),
            "assets/css/screen.css"
        );
        assert_eq!(to_slash_string(Path::new("single.css")), "single.css");
    }

    #[test]
    fn test_first_component() {
        assert_eq!(
            first_component(Path::new("node_modules/pkg/index.js")),
            Some("node_modules".to_string())
        );
        assert_eq!(
            first_component(Path::new("package.json")),
            Some("package.json".to_string())
        );
        assert_eq!(first_component(Path::new("")), None);
    }
}
