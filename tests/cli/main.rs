use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;
mod init;

const BIN_NAME: &str = "themelint";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    /// A theme that satisfies every theme-wide check: all required and
    /// recommended features referenced, full stylesheet headers, and all
    /// companion files present.
    pub fn with_complete_theme() -> Result<Self> {
        let test = Self::new()?;
        test.write_file("functions.php", FUNCTIONS_WITH_EVERYTHING)?;
        test.write_file("style.css", STYLE_WITH_HEADERS)?;
        test.write_file("screenshot.png", "")?;
        test.write_file("LICENSE", "GPL")?;
        test.write_file("readme.txt", "readme")?;
        Ok(test)
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check");
        cmd
    }

    pub fn init_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("init");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Run a command and return (stdout, stderr, exit code).
pub fn run(cmd: &mut Command) -> Result<(String, String, Option<i32>)> {
    let Output {
        status,
        stdout,
        stderr,
    } = cmd.output().context("Failed to run themelint binary")?;
    Ok((
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
        status.code(),
    ))
}

pub const FUNCTIONS_WITH_EVERYTHING: &str = r#"<?php
register_nav_menus(array());
add_theme_support('post-thumbnails');
add_theme_support('automatic-feed-links');
add_theme_support('title-tag');
register_sidebar(array());
wp_enqueue_style('main');
wp_enqueue_script('main');
add_action('wp_enqueue_scripts', 'theme_assets');
comments_template();
wp_list_comments();
wp_head();
wp_footer();
body_class();
wp_link_pages();
post_class();
comment_form();
posts_nav_link();
paginate_links();
the_posts_pagination();
$content_width = 1200;
register_block_style('x', array());
register_block_pattern('x', array());
add_theme_support('wp-block-styles');
add_theme_support('responsive-embeds');
add_theme_support('html5', $args);
add_theme_support('custom-background', $args);
add_theme_support('align-wide');
add_editor_style();
add_theme_support('custom-header', $args);
add_theme_support('custom-logo');
the_custom_logo();
add_theme_support('customize-selective-refresh-widgets');
"#;

pub const STYLE_WITH_HEADERS: &str = r#"/*
Theme Name: Test Theme
Description: A theme for tests
Author: Tests
Version: 1.0.0
License: GPL-2.0-or-later
License URI: https://www.gnu.org/licenses/gpl-2.0.html
Text Domain: test-theme
Tested up to: 6.4
*/
"#;
