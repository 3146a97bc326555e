use covfix::mcp::{
    CovfixMcpServer,
    types::{ApplyCoverageParams, ScanCoverageParams},
};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{
    McpTestFixture, assert_pagination, extract_tool_result_json, fixture_mixed,
    fixture_with_uncovered_models,
};

fn scan_params(fixture: &McpTestFixture, offset: Option<u32>, limit: Option<u32>) -> Parameters<ScanCoverageParams> {
    Parameters(ScanCoverageParams {
        project_root_path: fixture.root(),
        offset,
        limit,
    })
}

// ============================================================================
// scan_coverage tests
// ============================================================================

#[tokio::test]
async fn test_scan_coverage_empty_project() {
    let fixture = McpTestFixture::new().unwrap();
    let server = CovfixMcpServer::new();

    let result = server
        .scan_coverage(scan_params(&fixture, None, None))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 0);
    assert_eq!(json_result["totalFileCount"], 0);
    assert_eq!(json_result["items"], json!([]));
    assert_pagination(&json_result, 0, 50, false);
}

#[tokio::test]
async fn test_scan_coverage_items() {
    let fixture = fixture_mixed().unwrap();
    let server = CovfixMcpServer::new();

    let result = server
        .scan_coverage(scan_params(&fixture, None, None))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 2);
    assert_eq!(json_result["totalFileCount"], 2);

    let items = json_result["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    // Sorted by file path: tests/Feature before tests/Unit.
    let show = &items[0];
    assert!(
        show["filePath"]
            .as_str()
            .unwrap()
            .ends_with("tests/Feature/Posts/ShowTest.php")
    );
    assert_eq!(show["className"], "\\Tests\\Feature\\Posts\\ShowTest");
    assert_eq!(show["problem"], "missing");
    assert!(show["currentClass"].is_null());
    assert_eq!(show["expectedClass"], "\\App\\Posts");
    assert_eq!(show["coveredMethod"], "Show");
    assert_eq!(show["line"], 4);
    assert_eq!(show["attributesBefore"], json!([]));
    assert_eq!(show["attributesAfter"].as_array().unwrap().len(), 2);

    let team = &items[1];
    assert_eq!(team["problem"], "wrongTarget");
    assert_eq!(team["currentClass"], "\\App\\Models\\User");
    assert_eq!(team["expectedClass"], "\\App\\Models\\Team");
    assert!(team["coveredMethod"].is_null());
    assert_eq!(
        team["attributesBefore"],
        json!(["#[CoversClass(\\App\\Models\\User::class)]"])
    );
    assert_eq!(
        team["attributesAfter"],
        json!(["#[CoversClass(\\App\\Models\\Team::class)]"])
    );
}

#[tokio::test]
async fn test_scan_coverage_pagination() {
    let fixture = fixture_with_uncovered_models(25).unwrap();
    let server = CovfixMcpServer::new();

    let result = server
        .scan_coverage(scan_params(&fixture, Some(0), Some(10)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["totalCount"], 25);
    assert_eq!(json_result["items"].as_array().unwrap().len(), 10);
    assert_pagination(&json_result, 0, 10, true);
    assert_eq!(json_result["items"][0]["expectedClass"], "\\App\\Models\\Model00");

    let result = server
        .scan_coverage(scan_params(&fixture, Some(20), Some(10)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["items"].as_array().unwrap().len(), 5);
    assert_pagination(&json_result, 20, 10, false);
    assert_eq!(json_result["items"][0]["expectedClass"], "\\App\\Models\\Model20");
}

#[tokio::test]
async fn test_scan_coverage_limit_is_capped() {
    let fixture = fixture_with_uncovered_models(1).unwrap();
    let server = CovfixMcpServer::new();

    let result = server
        .scan_coverage(scan_params(&fixture, None, Some(500)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_pagination(&json_result, 0, 100, false);
}

#[tokio::test]
async fn test_scan_coverage_reports_parse_errors() {
    let fixture = McpTestFixture::with_php_files(vec![(
        "tests/Unit/BrokenTest.php",
        "<?php\nnamespace Tests\\Unit;\n\n#[CoversClass(Foo::class)\nclass BrokenTest {}\n",
    )])
    .unwrap();
    let server = CovfixMcpServer::new();

    let result = server
        .scan_coverage(scan_params(&fixture, None, None))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 0);
    let errors = json_result["parseErrors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]["error"]
            .as_str()
            .unwrap()
            .contains("unterminated attribute group")
    );
}

#[tokio::test]
async fn test_scan_coverage_invalid_path() {
    let server = CovfixMcpServer::new();

    let params = Parameters(ScanCoverageParams {
        project_root_path: "/definitely/not/a/real/path".to_string(),
        offset: None,
        limit: None,
    });

    let err = server.scan_coverage(params).await.unwrap_err();
    assert!(err.message.contains("Path does not exist"));
}

// ============================================================================
// apply_coverage tests
// ============================================================================

#[tokio::test]
async fn test_apply_coverage_rewrites_files() {
    let fixture = fixture_mixed().unwrap();
    let server = CovfixMcpServer::new();

    let result = server
        .apply_coverage(Parameters(ApplyCoverageParams {
            project_root_path: fixture.root(),
        }))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["classesRewritten"], 2);
    assert_eq!(json_result["filesModified"], 2);
    assert_eq!(json_result["parseErrors"], json!([]));

    let team = fixture
        .read_php_file("tests/Unit/Models/TeamTest.php")
        .unwrap();
    assert!(team.contains("#[CoversClass(\\App\\Models\\Team::class)]\nclass TeamTest"));

    let show = fixture
        .read_php_file("tests/Feature/Posts/ShowTest.php")
        .unwrap();
    assert!(show.contains(
        "#[\\PHPUnit\\Framework\\Attributes\\CoversMethod(\\App\\Posts::class, 'Show')]\nfinal class ShowTest"
    ));

    // A second scan finds nothing left to fix.
    let result = server
        .scan_coverage(scan_params(&fixture, None, None))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["totalCount"], 0);
}
