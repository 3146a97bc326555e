use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

mod tools;

/// Test fixture for MCP integration tests
///
/// Manages a temporary PHP project with a tests/ directory
pub struct McpTestFixture {
    _temp_dir: TempDir,
    project_root: PathBuf,
}

impl McpTestFixture {
    /// Create an empty test project
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_root = temp_dir.path().canonicalize()?;

        fs::create_dir_all(project_root.join("tests"))?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_root,
        })
    }

    /// Create a test project with PHP files
    ///
    /// # Example
    /// ```ignore
    /// let fixture = McpTestFixture::with_php_files(vec![
    ///     ("tests/Unit/FooTest.php", "<?php\nnamespace Tests\\Unit;\nclass FooTest {}\n"),
    /// ])?;
    /// ```
    pub fn with_php_files(files: Vec<(&str, &str)>) -> Result<Self> {
        let fixture = Self::new()?;
        for (path, content) in files {
            fixture.write_php_file(path, content)?;
        }
        Ok(fixture)
    }

    pub fn write_php_file(&self, relative_path: &str, content: &str) -> Result<()> {
        let path = self.project_root.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write PHP file: {}", path.display()))?;
        Ok(())
    }

    pub fn read_php_file(&self, relative_path: &str) -> Result<String> {
        let path = self.project_root.join(relative_path);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read PHP file: {}", path.display()))
    }

    /// Write a .covfixrc.json config file
    pub fn write_config(&self, content: &Value) -> Result<()> {
        let path = self.project_root.join(".covfixrc.json");
        let json_str = serde_json::to_string_pretty(content)?;
        fs::write(&path, format!("{}\n", json_str))?;
        Ok(())
    }

    /// Get the project root path as a string (for MCP parameters)
    pub fn root(&self) -> String {
        self.project_root.to_string_lossy().to_string()
    }
}

// ============================================================================
// Fixture Generators
// ============================================================================

/// Test class with no coverage attributes, `Tests\Unit\Models\{name}Test`
pub fn uncovered_model_test(name: &str) -> String {
    format!(
        "<?php\nnamespace Tests\\Unit\\Models;\n\nclass {}Test extends TestCase {{}}\n",
        name
    )
}

/// Create a fixture with `count` uncovered model tests, one per file
pub fn fixture_with_uncovered_models(count: usize) -> Result<McpTestFixture> {
    let fixture = McpTestFixture::new()?;
    for i in 0..count {
        let name = format!("Model{:02}", i);
        fixture.write_php_file(
            &format!("tests/Unit/Models/{}Test.php", name),
            &uncovered_model_test(&name),
        )?;
    }
    Ok(fixture)
}

/// Create a fixture mixing clean, wrong and CRUD-style test classes
pub fn fixture_mixed() -> Result<McpTestFixture> {
    McpTestFixture::with_php_files(vec![
        (
            "tests/Unit/Models/UserTest.php",
            r#"<?php
namespace Tests\Unit\Models;

use App\Models\User;
use PHPUnit\Framework\Attributes\CoversClass;

#[CoversClass(User::class)]
class UserTest extends TestCase {}
"#,
        ),
        (
            "tests/Unit/Models/TeamTest.php",
            r#"<?php
namespace Tests\Unit\Models;

use PHPUnit\Framework\Attributes\CoversClass;

#[CoversClass(\App\Models\User::class)]
class TeamTest extends TestCase {}
"#,
        ),
        (
            "tests/Feature/Posts/ShowTest.php",
            r#"<?php
namespace Tests\Feature\Posts;

final class ShowTest extends TestCase {}
"#,
        ),
    ])
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert pagination fields in a scan result
pub fn assert_pagination(
    result: &Value,
    expected_offset: usize,
    expected_limit: usize,
    expected_has_more: bool,
) {
    let pagination = &result["pagination"];
    assert_eq!(
        pagination["offset"].as_u64().unwrap(),
        expected_offset as u64,
        "Pagination offset mismatch"
    );
    assert_eq!(
        pagination["limit"].as_u64().unwrap(),
        expected_limit as u64,
        "Pagination limit mismatch"
    );
    assert_eq!(
        pagination["hasMore"].as_bool().unwrap(),
        expected_has_more,
        "Pagination hasMore mismatch"
    );
}

/// Extract JSON value from a successful CallToolResult
///
/// Panics if the result indicates an error or cannot be parsed
pub fn extract_tool_result_json(result: &rmcp::model::CallToolResult) -> Value {
    if let Some(true) = result.is_error {
        panic!("Tool call returned an error: {:?}", result);
    }

    assert!(
        !result.content.is_empty(),
        "Tool result should have content"
    );

    let content_item = &result.content[0];
    let text_content = content_item
        .as_text()
        .expect("Tool result content should be text");

    serde_json::from_str(&text_content.text).expect("Tool result should be valid JSON")
}
