//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve a cleaned URL path to a file under `theme_root`.
///
/// Canonicalizes to resolve symlinks and verifies the result stays under
/// the theme root, so encoded sequences and symlinks cannot escape it.
pub fn resolve_static(clean: &str, theme_root: &Path) -> Option<PathBuf> {
    // Reject paths with suspicious patterns early
    if clean.contains("..") {
        return None;
    }

    let local = theme_root.join(clean);

    let canonical = local.canonicalize().ok()?;
    let root_canonical = theme_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        // Path escapes the theme root - reject
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Normalize URL: decode, strip query string, trim slashes
pub fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split('?').next().unwrap_or(&decoded);
    path.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/home.liquid"), "home.liquid");
        assert_eq!(normalize_url("/img/logo.png?v=2"), "img/logo.png");
        assert_eq!(normalize_url("/a%20b.html"), "a b.html");
        assert_eq!(normalize_url("/"), "");
    }

    #[test]
    fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("img")).unwrap();
        fs::write(root.join("img/logo.png"), b"png").unwrap();

        let resolved = resolve_static("img/logo.png", root).unwrap();
        assert!(resolved.ends_with("img/logo.png"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_static("nope.png", dir.path()).is_none());
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop");
        fs::create_dir(&root).unwrap();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        assert!(resolve_static("../secret.txt", &root).is_none());
        assert!(resolve_static("img/../../secret.txt", &root).is_none());
    }
}
