use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const MISSING: &str = r#"<?php

namespace Tests\Unit\Services\Billing;

final class InvoiceServiceTest extends TestCase
{
}
"#;

const COVERED: &str = r#"<?php

namespace Tests\Unit\Services\Billing;

use App\Services\Billing\InvoiceService;
use PHPUnit\Framework\Attributes\CoversClass;

#[CoversClass(InvoiceService::class)]
final class InvoiceServiceTest extends TestCase
{
}
"#;

#[test]
fn test_missing_covers_class() -> Result<()> {
    let test = CliTest::with_file("tests/Unit/Services/Billing/InvoiceServiceTest.php", MISSING)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_clean_project() -> Result<()> {
    let test = CliTest::with_file("tests/Unit/Services/Billing/InvoiceServiceTest.php", COVERED)?;
    test.write_file("tests/TestCase.php", "<?php\nnamespace Tests;\n\nabstract class TestCase {}\n")?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_wrong_target() -> Result<()> {
    let test = CliTest::with_file(
        "tests/Unit/Models/UserTest.php",
        r#"<?php
namespace Tests\Unit\Models;

use App\Models\Team;
use PHPUnit\Framework\Attributes\CoversClass;

#[CoversClass(Team::class)]
class UserTest extends TestCase {}
"#,
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_crud_test_names_expect_covers_method() -> Result<()> {
    let test = CliTest::with_file(
        "tests/Feature/Http/Controllers/TeamController/DeleteTest.php",
        r#"<?php
namespace Tests\Feature\Http\Controllers\TeamController;

final class DeleteTest extends TestCase {}
"#,
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".covfixrc.json",
        r#"{
         "ignores": ["tests/Legacy"]
     }"#,
    )?;
    test.write_file("tests/Unit/Services/Billing/InvoiceServiceTest.php", COVERED)?;
    test.write_file("tests/Legacy/OldTest.php", MISSING)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_config_test_roots() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".covfixrc.json",
        r#"{
         "testRoots": [{ "prefix": "Acme\\Tests", "replacement": "Acme" }]
     }"#,
    )?;
    test.write_file(
        "tests/Domain/OrderTest.php",
        "<?php\nnamespace Acme\\Tests\\Domain;\n\nclass OrderTest {}\n",
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_single_file_target() -> Result<()> {
    let test = CliTest::with_file("tests/Unit/Services/Billing/InvoiceServiceTest.php", MISSING)?;
    test.write_file("tests/Unit/OtherTest.php", MISSING)?;

    assert_cmd_snapshot!(
        test.check_command()
            .arg("tests/Unit/Services/Billing/InvoiceServiceTest.php")
    );

    Ok(())
}

#[test]
fn test_parse_error_exits_with_error() -> Result<()> {
    let test = CliTest::with_file(
        "tests/Unit/BrokenTest.php",
        "<?php\nnamespace Tests\\Unit;\n\n/* never closed\nclass BrokenTest {}\n",
    )?;

    assert_cmd_snapshot!(test.check_command());

    // Verbose mode reports the parse failure on stderr as it happens.
    assert_cmd_snapshot!(test.check_command().arg("-v"));

    Ok(())
}

#[test]
fn test_missing_path() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.check_command().arg("does-not-exist"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for command in ["check", "fix", "resolve", "init", "serve"] {
        assert!(stdout.contains(command), "help should list {command}");
    }

    Ok(())
}
