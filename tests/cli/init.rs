use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["includes"], serde_json::json!(["tests"]));
    assert_eq!(parsed["fallbackNamespace"], "App");
    assert_eq!(parsed["verifyCoveredMethod"], false);
    assert_eq!(
        parsed["testRoots"][0],
        serde_json::json!({ "prefix": "Tests\\Feature", "replacement": "App" })
    );
    assert!(
        parsed["specialNames"]
            .as_array()
            .is_some_and(|names| names.iter().any(|n| n == "DeleteTest")),
        "Config should list the CRUD test names"
    );

    // 2-space indentation
    assert!(content.contains("\n  \"includes\""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"));

    assert!(test.root().join(".covfixrc.json").exists());

    let content = test.read_file(".covfixrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".covfixrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"));

    assert_eq!(test.read_file(".covfixrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "tests/Unit/Models/UserTest.php",
        "<?php\nnamespace Tests\\Unit\\Models;\n\n#[\\PHPUnit\\Framework\\Attributes\\CoversClass(\\App\\Models\\User::class)]\nclass UserTest {}\n",
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}
