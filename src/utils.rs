//! Common utility functions shared across the codebase.

use std::path::Path;

/// Render a file path relative to the theme root for labels and progress
/// output. Falls back to the path as given when it is not under the root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use themelint::utils::display_path;
///
/// assert_eq!(display_path("/theme/header.php", Path::new("/theme")), "header.php");
/// assert_eq!(display_path("other/file.php", Path::new("/theme")), "other/file.php");
/// ```
pub fn display_path(path: &str, root: &Path) -> String {
    Path::new(path)
        .strip_prefix(root)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::utils::*;

    #[test]
    fn test_display_path() {
        assert_eq!(
            display_path("/theme/inc/setup.php", Path::new("/theme")),
            "inc/setup.php"
        );
        assert_eq!(display_path("./header.php", Path::new(".")), "header.php");
        assert_eq!(
            display_path("/elsewhere/file.php", Path::new("/theme")),
            "/elsewhere/file.php"
        );
    }
}
