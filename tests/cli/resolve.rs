use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_resolve_plain_test_class() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.resolve_command(r"Tests\Unit\Services\Billing\InvoiceServiceTest"));

    Ok(())
}

#[test]
fn test_resolve_crud_test_class() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.resolve_command(
        r"Tests\Feature\Http\Controllers\TeamController\UpdateTest"
    ));

    Ok(())
}

#[test]
fn test_resolve_unmapped_namespace_uses_fallback() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".covfixrc.json", r#"{ "fallbackNamespace": "Core" }"#)?;

    assert_cmd_snapshot!(test.resolve_command(r"Other\Place\WidgetTest"));

    Ok(())
}

#[test]
fn test_resolve_non_test_class() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.resolve_command(r"App\Models\User"));

    Ok(())
}

#[test]
fn test_resolve_rejects_invalid_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".covfixrc.json", r#"{ "fallbackNamespace": "" }"#)?;

    assert_cmd_snapshot!(test.resolve_command(r"Tests\Unit\FooTest"));

    Ok(())
}
