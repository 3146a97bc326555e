use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const WRONG_TARGET: &str = r#"<?php
namespace Tests\Unit\Models;

use App\Models\Team;
use PHPUnit\Framework\Attributes\CoversClass;

#[CoversClass(Team::class)]
class UserTest extends TestCase {}
"#;

#[test]
fn test_fix_dry_run() -> Result<()> {
    let test = CliTest::with_file("tests/Unit/Models/UserTest.php", WRONG_TARGET)?;

    assert_cmd_snapshot!(test.fix_command());

    // Dry-run leaves the file alone.
    assert_eq!(test.read_file("tests/Unit/Models/UserTest.php")?, WRONG_TARGET);

    Ok(())
}

#[test]
fn test_fix_apply_replaces_wrong_target() -> Result<()> {
    let test = CliTest::with_file("tests/Unit/Models/UserTest.php", WRONG_TARGET)?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd);

    let content = test.read_file("tests/Unit/Models/UserTest.php")?;
    assert!(content.contains("#[CoversClass(\\App\\Models\\User::class)]\nclass UserTest extends TestCase {}"));
    assert!(!content.contains("#[CoversClass(Team::class)]"));
    // Imports are left untouched.
    assert!(content.contains("use App\\Models\\Team;"));

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_fix_apply_inserts_missing_attributes() -> Result<()> {
    let test = CliTest::with_file(
        "tests/Feature/Http/Controllers/TeamController/DeleteTest.php",
        r#"<?php
namespace Tests\Feature\Http\Controllers\TeamController;

use App\Http\Controllers\TeamController;
use PHPUnit\Framework\Attributes\CoversClass;
use PHPUnit\Framework\Attributes\CoversMethod;

final class DeleteTest extends TestCase
{
}
"#,
    )?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd);

    let content = test.read_file("tests/Feature/Http/Controllers/TeamController/DeleteTest.php")?;
    assert!(content.contains(
        "#[CoversClass(TeamController::class)]\n#[CoversMethod(TeamController::class, 'Delete')]\nfinal class DeleteTest extends TestCase"
    ));

    Ok(())
}

#[test]
fn test_fix_apply_class_sharing_line_with_open_tag() -> Result<()> {
    let test = CliTest::with_file("tests/FooTest.php", "<?php class FooTest extends TestCase {}\n")?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd);

    assert_eq!(
        test.read_file("tests/FooTest.php")?,
        "<?php #[\\PHPUnit\\Framework\\Attributes\\CoversClass(\\App\\Foo::class)]\nclass FooTest extends TestCase {}\n"
    );

    // A second run finds nothing left to rewrite.
    assert_cmd_snapshot!(test.fix_command());

    Ok(())
}

#[test]
fn test_fix_replaces_first_group_only() -> Result<()> {
    let test = CliTest::with_file(
        "tests/Unit/Services/MailerTest.php",
        r#"<?php
namespace Tests\Unit\Services;

use PHPUnit\Framework\Attributes\CoversClass;
use PHPUnit\Framework\Attributes\Group;

#[CoversClass(\App\Services\Sender::class)]
#[Group('mail')]
class MailerTest {}
"#,
    )?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd);

    let content = test.read_file("tests/Unit/Services/MailerTest.php")?;
    assert!(content.contains(
        "#[CoversClass(\\App\\Services\\Mailer::class)]\n#[Group('mail')]\nclass MailerTest {}"
    ));
    assert!(!content.contains("Sender"));

    Ok(())
}

#[test]
fn test_fix_nothing_to_do() -> Result<()> {
    let test = CliTest::with_file(
        "tests/Unit/Models/UserTest.php",
        r#"<?php
namespace Tests\Unit\Models;

#[\PHPUnit\Framework\Attributes\CoversClass(\App\Models\User::class)]
class UserTest {}
"#,
    )?;

    assert_cmd_snapshot!(test.fix_command());

    Ok(())
}
