//! Theme-wide scan and global finding synthesis.
//!
//! The corpus scan walks every theme file once: it runs the local scanner
//! per file (committing results to the diagnostic store as it goes) while
//! accumulating theme-wide facts: the distinct text domains used, and
//! which required features were seen anywhere. After the walk it turns the
//! facts into global findings (inconsistent text domains, missing required
//! features, missing companion files, missing stylesheet headers) and
//! appends them to the theme's home file entry.
//!
//! File access goes through the [`ThemeFiles`] seam so the scan can be
//! driven from the CLI, the MCP server, or tests alike. Cancellation is
//! cooperative and checked once per file; a cancelled scan keeps the
//! fresh results committed so far, leaves unscanned files untouched, and
//! synthesizes no global findings, since absence findings computed from a
//! partial walk would be wrong.

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use colored::Colorize;
use regex::Regex;

use crate::catalog::Catalog;
use crate::findings::{Category, Finding, Location, Severity};
use crate::scanner;
use crate::store::DiagnosticStore;

// ============================================================
// Seams
// ============================================================

/// File access for a theme directory.
///
/// Paths already under the theme root (as produced by discovery) are used
/// as-is; bare names like `screenshot.png` are resolved against the root.
pub trait ThemeFiles {
    fn read_text(&self, path: &str) -> io::Result<String>;
    fn exists(&self, path: &str) -> bool;
}

/// [`ThemeFiles`] over the real filesystem.
pub struct FsThemeFiles {
    root: PathBuf,
}

impl FsThemeFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() || p.starts_with(&self.root) {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}

impl ThemeFiles for FsThemeFiles {
    fn read_text(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

/// Cooperative cancellation flag, polled once per file boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ============================================================
// Options and outcome
// ============================================================

pub struct CorpusOptions {
    /// File theme-wide findings are anchored to.
    pub entry_file: String,
    /// Metadata stylesheet checked for required headers.
    pub stylesheet: String,
    /// Restrict checks to these categories (None = all).
    pub categories: Option<HashSet<Category>>,
    pub verbose: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            entry_file: "functions.php".to_string(),
            stylesheet: "style.css".to_string(),
            categories: None,
            verbose: false,
        }
    }
}

#[derive(Debug)]
pub struct CorpusOutcome {
    pub files_scanned: usize,
    pub read_failures: usize,
    pub cancelled: bool,
    /// The file global findings were attached to, when one was found.
    pub home_file: Option<String>,
    /// Distinct text domains observed across the theme, sorted.
    pub domains: Vec<String>,
    /// Number of global findings synthesized.
    pub global_findings: usize,
}

// ============================================================
// Theme-wide facts
// ============================================================

/// Required stylesheet header labels; each missing one is an error.
const REQUIRED_STYLE_HEADERS: &[&str] = &[
    "Theme Name:",
    "Description:",
    "Author:",
    "Version:",
    "License:",
    "License URI:",
    "Text Domain:",
];

const RECOMMENDED_STYLE_HEADER: &str = "Tested up to:";

/// Translation calls that carry a text domain as their final argument.
fn text_domain_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:_e|__|esc_html__|esc_attr__|esc_html_e|esc_attr_e)\s*\(\s*['"][^'"]+['"]\s*,\s*['"]([^'"]+)['"]\s*\)"#,
        )
        .ok()
    })
    .as_ref()
}

/// Facts accumulated over one corpus walk. Rebuilt on every full scan and
/// discarded once global findings are synthesized.
#[derive(Debug, Default)]
struct CorpusFacts {
    domains: BTreeSet<String>,
    features_seen: HashSet<&'static str>,
}

impl CorpusFacts {
    fn collect(&mut self, catalog: &Catalog, text: &str) {
        if let Some(re) = text_domain_regex() {
            for caps in re.captures_iter(text) {
                if let Some(domain) = caps.get(1) {
                    self.domains.insert(domain.as_str().to_string());
                }
            }
        }

        for rule in catalog.required_rules() {
            if self.features_seen.contains(rule.message) {
                continue;
            }
            if rule.regex.is_match(text) {
                self.features_seen.insert(rule.message);
            }
        }
    }
}

// ============================================================
// The corpus scan
// ============================================================

/// Scan every file in `files`, repopulating the store with each file's
/// local findings and finally appending theme-wide findings to the home
/// file. See the module docs for cancellation and failure semantics.
pub fn scan_corpus(
    catalog: &Catalog,
    files: &[String],
    provider: &dyn ThemeFiles,
    store: &mut DiagnosticStore,
    opts: &CorpusOptions,
    mut progress: impl FnMut(usize, usize, &str),
    cancel: &CancelToken,
) -> CorpusOutcome {
    let home_file = find_home_file(files, opts);

    let total = files.len();
    let mut facts = CorpusFacts::default();
    let mut files_scanned = 0;
    let mut read_failures = 0;
    let mut cancelled = false;

    for file in files {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let text = match provider.read_text(file) {
            Ok(text) => text,
            Err(err) => {
                // An unreadable file keeps its previous findings, if any.
                read_failures += 1;
                if opts.verbose {
                    eprintln!(
                        "{} Cannot read {}: {}",
                        "warning:".bold().yellow(),
                        file,
                        err
                    );
                }
                continue;
            }
        };

        let findings =
            scanner::scan_file_filtered(catalog, file, &text, opts.categories.as_ref());
        store.set_for_file(file, findings);
        facts.collect(catalog, &text);

        files_scanned += 1;
        progress(files_scanned, total, file);
    }

    if cancelled {
        return CorpusOutcome {
            files_scanned,
            read_failures,
            cancelled,
            home_file: None,
            domains: facts.domains.into_iter().collect(),
            global_findings: 0,
        };
    }

    let anchor = home_file.clone().unwrap_or_default();
    let mut globals = synthesize_global_findings(catalog, &facts, provider, opts, &anchor);
    if let Some(selected) = &opts.categories {
        globals.retain(|f| selected.contains(&f.category));
    }
    let global_findings = globals.len();

    match &home_file {
        Some(home) => store.append_for_file(home, globals),
        // Without a home file there is nowhere to surface theme-wide
        // findings; they are computed and dropped.
        None => {}
    }

    CorpusOutcome {
        files_scanned,
        read_failures,
        cancelled,
        home_file,
        domains: facts.domains.into_iter().collect(),
        global_findings,
    }
}

/// The first entry-point file in list order, falling back to the first
/// stylesheet-named file.
fn find_home_file(files: &[String], opts: &CorpusOptions) -> Option<String> {
    let by_name = |name: &str| {
        files
            .iter()
            .find(|f| {
                Path::new(f)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n == name)
            })
            .cloned()
    };
    by_name(&opts.entry_file).or_else(|| by_name(&opts.stylesheet))
}

fn synthesize_global_findings(
    catalog: &Catalog,
    facts: &CorpusFacts,
    provider: &dyn ThemeFiles,
    opts: &CorpusOptions,
    anchor: &str,
) -> Vec<Finding> {
    let mut globals = Vec::new();
    let at_home = || Location::file_start(anchor);

    // More than one text domain in a single theme.
    if facts.domains.len() > 1 {
        let domains: Vec<&str> = facts.domains.iter().map(String::as_str).collect();
        globals.push(Finding::new(
            at_home(),
            format!(
                "More than one text-domain is being used in this theme. The domains found are: {}.",
                domains.join(", ")
            ),
            Severity::Warning,
            Category::I18n,
        ));
    }

    // Required features never observed anywhere in the theme.
    for rule in catalog.required_rules() {
        if !facts.features_seen.contains(rule.message) {
            globals.push(Finding::new(
                at_home(),
                rule.message,
                rule.severity,
                rule.category,
            ));
        }
    }

    // Companion files.
    if !provider.exists("screenshot.png") && !provider.exists("screenshot.jpg") {
        globals.push(Finding::new(
            at_home(),
            "REQUIRED: Screenshot is missing! Add a screenshot.png or screenshot.jpg.",
            Severity::Error,
            Category::Required,
        ));
    }
    if !provider.exists("LICENSE") && !provider.exists("LICENSE.txt") {
        globals.push(Finding::new(
            at_home(),
            "REQUIRED: License file is missing! Add a LICENSE or LICENSE.txt file.",
            Severity::Error,
            Category::Licensing,
        ));
    }
    if !provider.exists("readme.txt") {
        globals.push(Finding::new(
            at_home(),
            "RECOMMENDED: readme.txt is missing.",
            Severity::Info,
            Category::Recommended,
        ));
    }

    // Stylesheet headers.
    match provider.read_text(&opts.stylesheet) {
        Ok(style_text) => {
            for header in REQUIRED_STYLE_HEADERS {
                if !style_text.contains(header) {
                    globals.push(Finding::new(
                        at_home(),
                        format!(
                            "REQUIRED: {} is missing required header: {}",
                            opts.stylesheet, header
                        ),
                        Severity::Error,
                        Category::Required,
                    ));
                }
            }
            if !style_text.contains(RECOMMENDED_STYLE_HEADER) {
                globals.push(Finding::new(
                    at_home(),
                    format!(
                        "RECOMMENDED: {} should include '{}' header.",
                        opts.stylesheet, RECOMMENDED_STYLE_HEADER
                    ),
                    Severity::Info,
                    Category::Recommended,
                ));
            }
        }
        Err(_) => {
            globals.push(Finding::new(
                at_home(),
                format!("REQUIRED: {} is missing!", opts.stylesheet),
                Severity::Error,
                Category::Required,
            ));
        }
    }

    globals
}
