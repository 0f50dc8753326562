use super::base::{Tool, ToolContext, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

/// ReadDocument tool - returns the full text of a document
pub struct ReadDocumentTool;

#[derive(Debug, Deserialize)]
struct ReadDocumentParams {
    filename: PathBuf,
}

#[async_trait::async_trait]
impl Tool for ReadDocumentTool {
    fn id(&self) -> &str {
        "read_document"
    }

    fn description(&self) -> &str {
        "Read the given document and return its full text content."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the document to read (absolute or relative)"
                }
            },
            "required": ["filename"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ReadDocumentParams =
            serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        // Resolve relative to the working directory.
        let filepath = if params.filename.is_absolute() {
            params.filename.clone()
        } else {
            ctx.working_dir.join(&params.filename)
        };

        tracing::debug!(
            working_dir = %ctx.working_dir.display(),
            filename = %params.filename.display(),
            "tool read_document start"
        );

        // A missing file is an answer for the model, not an error.
        if !filepath.exists() {
            return Ok(ToolResult::new(
                params.filename.to_string_lossy(),
                format!("{} does not exist.", params.filename.display()),
            )
            .with_metadata("found", json!(false)));
        }

        let content = tokio::fs::read_to_string(&filepath)
            .await
            .map_err(|e| ToolError::Other(e.into()))?;

        let output = format!(
            "File: {} contains the following content:\n\n{}",
            params.filename.display(),
            content
        );

        tracing::debug!(
            resolved_path = %filepath.display(),
            bytes = content.len(),
            "tool read_document done"
        );

        Ok(ToolResult::new(filepath.to_string_lossy(), output)
            .with_metadata("found", json!(true))
            .with_metadata("bytes", json!(content.len())))
    }
}
