use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_check_clean_theme() -> Result<()> {
    let test = CliTest::with_complete_theme()?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(stdout.contains("no issues found"), "stdout: {}", stdout);
    assert_eq!(code, Some(0));

    Ok(())
}

#[test]
fn test_check_reports_forbidden_function() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file("header.php", "<?php\neval($code);\n")?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(stdout.contains("error: eval() is not allowed"), "stdout: {}", stdout);
    assert!(stdout.contains("header.php:2:1"), "stdout: {}", stdout);
    assert!(stdout.contains("security"), "stdout: {}", stdout);
    assert_eq!(code, Some(1));

    Ok(())
}

#[test]
fn test_check_missing_companion_files() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("functions.php", crate::FUNCTIONS_WITH_EVERYTHING)?;
    test.write_file("style.css", crate::STYLE_WITH_HEADERS)?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(stdout.contains("Screenshot is missing"), "stdout: {}", stdout);
    assert!(stdout.contains("License file is missing"), "stdout: {}", stdout);
    assert!(stdout.contains("readme.txt is missing"), "stdout: {}", stdout);
    // Both hard failures anchor at the home file.
    assert!(stdout.contains("functions.php:1:1"), "stdout: {}", stdout);
    assert_eq!(code, Some(1));

    Ok(())
}

#[test]
fn test_check_missing_required_features() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("functions.php", "<?php wp_head(); wp_footer();\n")?;
    test.write_file("style.css", crate::STYLE_WITH_HEADERS)?;
    test.write_file("screenshot.png", "")?;
    test.write_file("LICENSE", "GPL")?;
    test.write_file("readme.txt", "readme")?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(stdout.contains("REQUIRED: register_sidebar()"), "stdout: {}", stdout);
    assert!(stdout.contains("RECOMMENDED: No reference to add_editor_style()"), "stdout: {}", stdout);
    // Observed features must not be reported missing.
    assert!(!stdout.contains("REQUIRED: wp_head()"), "stdout: {}", stdout);
    assert_eq!(code, Some(1));

    Ok(())
}

#[test]
fn test_check_missing_stylesheet_header() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file(
        "style.css",
        "/*\nTheme Name: X\nDescription: X\nAuthor: X\nLicense: GPL\nLicense URI: x\nText Domain: x\nTested up to: 6.4\n*/",
    )?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(
        stdout.contains("style.css is missing required header: Version:"),
        "stdout: {}",
        stdout
    );
    assert_eq!(code, Some(1));

    Ok(())
}

#[test]
fn test_check_multiple_text_domains() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file("header.php", "<?php _e('Hello', 'alpha'); ?>\n")?;
    test.write_file("footer.php", "<?php _e('Bye', 'beta'); ?>\n")?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(
        stdout.contains("More than one text-domain is being used"),
        "stdout: {}",
        stdout
    );
    assert!(stdout.contains("alpha, beta"), "stdout: {}", stdout);
    // A lone domain inconsistency is a warning, not an error.
    assert_eq!(code, Some(0));

    Ok(())
}

#[test]
fn test_check_category_filter() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file("inc/extras.php", "<?php\neval($x);\nwp_mail($to);\n")?;

    let mut cmd = test.check_command();
    cmd.arg("security");
    let (stdout, _, code) = run(&mut cmd)?;

    assert!(stdout.contains("eval() is not allowed"), "stdout: {}", stdout);
    assert!(!stdout.contains("wp_mail()"), "stdout: {}", stdout);
    assert_eq!(code, Some(1));

    Ok(())
}

#[test]
fn test_check_replacement_note() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file("sidebar.php", "<?php get_current_theme(); ?>\n")?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(
        stdout.contains("suggested replacement: wp_get_theme()"),
        "stdout: {}",
        stdout
    );
    // Deprecated API use is a warning, not an error.
    assert_eq!(code, Some(0));

    Ok(())
}

#[test]
fn test_check_config_ignores() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file(
        ".themelintrc.json",
        r#"{ "ignores": ["**/third-party/**"] }"#,
    )?;
    test.write_file("third-party/lib.php", "<?php eval($x); ?>\n")?;

    let (stdout, _, code) = run(&mut test.check_command())?;

    assert!(!stdout.contains("eval()"), "stdout: {}", stdout);
    assert_eq!(code, Some(0));

    Ok(())
}

#[test]
fn test_check_summary_line() -> Result<()> {
    let test = CliTest::with_complete_theme()?;
    test.write_file("header.php", "<?php\neval($a);\nbase64_decode($b);\n")?;

    let (stdout, _, _) = run(&mut test.check_command())?;

    assert!(stdout.contains("2 problems (2 errors, 0 warnings, 0 infos)"), "stdout: {}", stdout);

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let (stdout, _, code) = run(test.command().arg("--help"))?;

    assert!(stdout.contains("check"), "stdout: {}", stdout);
    assert!(stdout.contains("init"), "stdout: {}", stdout);
    assert!(stdout.contains("serve"), "stdout: {}", stdout);
    assert_eq!(code, Some(0));

    Ok(())
}
