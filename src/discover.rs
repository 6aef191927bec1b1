//! Theme file discovery.
//!
//! Walks the theme root and collects the PHP files to check, honoring the
//! configured include directories and ignore patterns. Dependency
//! directories are excluded by default via the config's ignore list.
//! Results are sorted so the home-file choice and report order are
//! deterministic.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of discovering theme files.
pub struct DiscoverResult {
    /// Sorted paths of the PHP files to scan.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

pub fn discover_theme_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    verbose: bool,
) -> DiscoverResult {
    let mut files: BTreeSet<String> = BTreeSet::new();
    let mut skipped_count = 0;

    // Separate ignore patterns into literal paths and glob patterns
    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            // Literal path mode: prefix matching against the joined path
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                // Glob mode: expand pattern to matching directories
                let full_pattern = base_dir.join(inc);
                let pattern_str = full_pattern.to_string_lossy();
                match glob(&pattern_str) {
                    Ok(entries) => {
                        for entry in entries.flatten() {
                            if entry.is_dir() {
                                paths.push(entry);
                            }
                        }
                    }
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid glob pattern '{}': {}",
                                "warning:".bold().yellow(),
                                inc,
                                e
                            );
                        }
                    }
                }
            } else {
                // Literal path mode: use as-is
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else if verbose {
                    eprintln!(
                        "{} Include path does not exist: {}",
                        "warning:".bold().yellow(),
                        path.display()
                    );
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_theme_source_file(path) {
                files.insert(path_str.into());
            }
        }
    }

    DiscoverResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn is_theme_source_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("php"))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_discover_php_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("functions.php")).unwrap();
        File::create(dir_path.join("index.php")).unwrap();
        File::create(dir_path.join("style.css")).unwrap();
        File::create(dir_path.join("screenshot.png")).unwrap();

        let result = discover_theme_files(dir_path, &[], &[], false);

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("functions.php")));
        assert!(result.files.iter().any(|f| f.ends_with("index.php")));
        assert!(!result.files.iter().any(|f| f.ends_with("style.css")));
    }

    #[test]
    fn test_discover_is_sorted() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("single.php")).unwrap();
        File::create(dir_path.join("archive.php")).unwrap();
        File::create(dir_path.join("header.php")).unwrap();

        let result = discover_theme_files(dir_path, &[], &[], false);
        let mut sorted = result.files.clone();
        sorted.sort();
        assert_eq!(result.files, sorted);
    }

    #[test]
    fn test_discover_ignores_vendor_glob() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let vendor = dir_path.join("vendor");
        fs::create_dir(&vendor).unwrap();
        File::create(vendor.join("lib.php")).unwrap();
        File::create(dir_path.join("functions.php")).unwrap();

        let result =
            discover_theme_files(dir_path, &[], &["**/vendor/**".to_owned()], false);

        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.contains("vendor")));
    }

    #[test]
    fn test_discover_ignores_literal_directory() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let inc = dir_path.join("inc");
        fs::create_dir(&inc).unwrap();
        File::create(inc.join("generated.php")).unwrap();
        File::create(dir_path.join("functions.php")).unwrap();

        let result = discover_theme_files(dir_path, &[], &["inc".to_owned()], false);

        assert_eq!(result.files.len(), 1);
        assert!(result.files.iter().any(|f| f.ends_with("functions.php")));
    }

    #[test]
    fn test_discover_with_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let templates = dir_path.join("templates");
        fs::create_dir(&templates).unwrap();
        File::create(templates.join("page.php")).unwrap();
        File::create(dir_path.join("functions.php")).unwrap();

        let result =
            discover_theme_files(dir_path, &["templates".to_owned()], &[], false);

        assert_eq!(result.files.len(), 1);
        assert!(result.files.iter().any(|f| f.ends_with("page.php")));
    }

    #[test]
    fn test_discover_nested_directories() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let parts = dir_path.join("template-parts").join("content");
        fs::create_dir_all(&parts).unwrap();
        File::create(parts.join("content-single.php")).unwrap();
        File::create(dir_path.join("index.php")).unwrap();

        let result = discover_theme_files(dir_path, &[], &[], false);
        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn test_is_theme_source_file() {
        assert!(is_theme_source_file(Path::new("functions.php")));
        assert!(!is_theme_source_file(Path::new("style.css")));
        assert!(!is_theme_source_file(Path::new("readme.txt")));
        assert!(!is_theme_source_file(Path::new("screenshot.png")));
    }
}
