use std::collections::{HashMap, HashSet};

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use rayon::prelude::*;

use super::super::args::CheckCommand;
use super::{
    helper::finish,
    {CommandResult, CommandSummary},
};

use crate::{
    catalog::Catalog,
    config::load_config,
    corpus::{CancelToken, CorpusOptions, FsThemeFiles, ThemeFiles, scan_corpus},
    discover::discover_theme_files,
    findings::Category,
    store::DiagnosticStore,
    utils::display_path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CheckCategory {
    Security,
    Escaping,
    Deprecated,
    TextDomain,
    PluginTerritory,
    Cdn,
    Enqueue,
    BestPractices,
    Licensing,
    Required,
    Recommended,
    I18n,
}

impl CheckCategory {
    pub fn category(self) -> Category {
        match self {
            CheckCategory::Security => Category::Security,
            CheckCategory::Escaping => Category::Escaping,
            CheckCategory::Deprecated => Category::Deprecated,
            CheckCategory::TextDomain => Category::TextDomain,
            CheckCategory::PluginTerritory => Category::PluginTerritory,
            CheckCategory::Cdn => Category::Cdn,
            CheckCategory::Enqueue => Category::Enqueue,
            CheckCategory::BestPractices => Category::BestPractices,
            CheckCategory::Licensing => Category::Licensing,
            CheckCategory::Required => Category::Required,
            CheckCategory::Recommended => Category::Recommended,
            CheckCategory::I18n => Category::I18n,
        }
    }
}

/// File access backed by texts pre-read in parallel, falling back to the
/// filesystem for anything outside the pre-read set (companion files, the
/// stylesheet).
struct CachedThemeFiles {
    fs: FsThemeFiles,
    texts: HashMap<String, String>,
}

impl ThemeFiles for CachedThemeFiles {
    fn read_text(&self, path: &str) -> std::io::Result<String> {
        match self.texts.get(path) {
            Some(text) => Ok(text.clone()),
            None => self.fs.read_text(path),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.texts.contains_key(path) || self.fs.exists(path)
    }
}

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let common = &cmd.args.common;
    let root = &common.theme_root;
    let verbose = common.verbose;

    let config_result = load_config(root)?;
    if verbose && !config_result.from_file {
        eprintln!("Note: No .themelintrc.json found, using default configuration");
    }
    let config = config_result.config;

    let discovered = discover_theme_files(root, &config.includes, &config.ignores, verbose);
    if discovered.skipped_count > 0 {
        eprintln!(
            "{} {} path(s) skipped due to access errors{}",
            "warning:".bold().yellow(),
            discovered.skipped_count,
            if verbose { "" } else { " (use -v for details)" }
        );
    }

    // Pre-read the theme's files in parallel; the aggregator itself walks
    // them sequentially so commit order and cancellation stay per-file.
    let texts: HashMap<String, String> = discovered
        .files
        .par_iter()
        .filter_map(|file| {
            std::fs::read_to_string(file)
                .ok()
                .map(|text| (file.clone(), text))
        })
        .collect();
    let provider = CachedThemeFiles {
        fs: FsThemeFiles::new(root.clone()),
        texts,
    };

    let categories: Option<HashSet<Category>> = if cmd.categories.is_empty() {
        None
    } else {
        Some(cmd.categories.iter().map(|c| c.category()).collect())
    };

    let opts = CorpusOptions {
        entry_file: config.entry_file.clone(),
        stylesheet: config.stylesheet.clone(),
        categories,
        verbose,
    };

    let mut store = DiagnosticStore::new();
    let outcome = scan_corpus(
        Catalog::global(),
        &discovered.files,
        &provider,
        &mut store,
        &opts,
        |done, total, label| {
            if verbose {
                eprintln!("[{}/{}] {}", done, total, display_path(label, root));
            }
        },
        &CancelToken::new(),
    );

    Ok(finish(
        CommandSummary::Check,
        store.all_findings(),
        outcome.files_scanned,
        outcome.read_failures,
        true,
    ))
}
