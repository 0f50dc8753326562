//! Integration tests for the read_document tool

mod common;

use common::TestFixture;
use serde_json::json;
use websum::tool::{base::*, read_document::ReadDocumentTool};

/// Helper to create a tool context for testing
fn create_test_context(working_dir: std::path::PathBuf) -> ToolContext {
    ToolContext::new("test_session", "test_msg", "test_agent", working_dir)
}

#[tokio::test]
async fn test_read_existing_document() {
    let fixture = TestFixture::new();
    fixture.create_file("notes.txt", "Meeting notes\nline two");

    let tool = ReadDocumentTool;
    let ctx = create_test_context(fixture.path());

    let params = json!({ "filename": "notes.txt" });
    let result = tool.execute(params, &ctx).await.unwrap();

    assert!(result
        .output
        .contains("File: notes.txt contains the following content:"));
    assert!(result.output.contains("Meeting notes"));
    assert!(result.output.contains("line two"));
    assert_eq!(result.metadata.get("found"), Some(&json!(true)));
}

#[tokio::test]
async fn test_read_missing_document_returns_message() {
    let fixture = TestFixture::new();
    let tool = ReadDocumentTool;
    let ctx = create_test_context(fixture.path());

    let params = json!({ "filename": "missing.txt" });
    let result = tool.execute(params, &ctx).await.unwrap();

    assert_eq!(result.output, "missing.txt does not exist.");
    assert_eq!(result.metadata.get("found"), Some(&json!(false)));
}

#[tokio::test]
async fn test_read_absolute_path() {
    let fixture = TestFixture::new();
    let filepath = fixture.create_file("abs.txt", "absolute content");

    let tool = ReadDocumentTool;
    // Working dir points elsewhere; the absolute path must win.
    let ctx = create_test_context(std::path::PathBuf::from("/"));

    let params = json!({ "filename": filepath.to_string_lossy() });
    let result = tool.execute(params, &ctx).await.unwrap();

    assert!(result.output.contains("absolute content"));
}

#[tokio::test]
async fn test_read_rejects_bad_params() {
    let fixture = TestFixture::new();
    let tool = ReadDocumentTool;
    let ctx = create_test_context(fixture.path());

    let result = tool.execute(json!({ "path": "wrong-key.txt" }), &ctx).await;
    assert!(matches!(result, Err(ToolError::InvalidParams(_))));
}
