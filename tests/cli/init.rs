use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (stdout, _, code) = run(&mut test.init_command())?;

    assert!(stdout.contains("Created .themelintrc.json"), "stdout: {}", stdout);
    assert_eq!(code, Some(0));

    let config = test.read_file(".themelintrc.json")?;
    assert!(config.contains("entryFile"));
    assert!(config.contains("functions.php"));

    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::with_file(".themelintrc.json", "{}")?;

    let (_, stderr, code) = run(&mut test.init_command())?;

    assert!(stderr.contains("already exists"), "stderr: {}", stderr);
    assert_eq!(code, Some(2));

    Ok(())
}
