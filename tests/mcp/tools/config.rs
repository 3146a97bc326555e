use covfix::mcp::{CovfixMcpServer, types::GetConfigParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

// ============================================================================
// get_config tests
// ============================================================================

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = CovfixMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], false);
    assert!(json_result["configPath"].is_null());
    assert_eq!(json_result["config"]["includes"], json!(["tests"]));
    assert_eq!(json_result["config"]["fallbackNamespace"], "App");
    assert_eq!(json_result["config"]["verifyCoveredMethod"], false);
    assert_eq!(
        json_result["config"]["testRoots"],
        json!([
            { "prefix": "Tests\\Feature", "replacement": "App" },
            { "prefix": "Tests\\Unit", "replacement": "App" }
        ])
    );
    assert_eq!(
        json_result["config"]["specialNames"].as_array().unwrap().len(),
        6
    );
}

#[tokio::test]
async fn test_get_config_from_covfixrc() {
    let fixture = McpTestFixture::new().unwrap();

    fixture
        .write_config(&json!({
            "includes": ["tests/Unit"],
            "fallbackNamespace": "Domain",
            "verifyCoveredMethod": true
        }))
        .unwrap();

    let server = CovfixMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert!(
        json_result["configPath"]
            .as_str()
            .unwrap()
            .ends_with(".covfixrc.json")
    );
    assert_eq!(json_result["config"]["includes"], json!(["tests/Unit"]));
    assert_eq!(json_result["config"]["fallbackNamespace"], "Domain");
    assert_eq!(json_result["config"]["verifyCoveredMethod"], true);
    // Unset fields keep their defaults.
    assert_eq!(
        json_result["config"]["testRoots"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_get_config_invalid_file() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({ "testRoots": [{ "prefix": "", "replacement": "App" }] }))
        .unwrap();

    let server = CovfixMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let err = server.get_config(params).await.unwrap_err();
    assert!(err.message.contains("Failed to load config"));
}
