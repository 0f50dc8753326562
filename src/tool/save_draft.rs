use super::base::{Tool, ToolContext, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::json;
use similar::TextDiff;
use std::path::Path;
use std::path::PathBuf;

/// SaveDraft tool - writes the current draft to a file.
///
/// Saving is gated on an explicit user instruction; the gate lives in the
/// drafter system prompt and is restated in the tool description.
pub struct SaveDraftTool;

#[derive(Debug, Deserialize)]
struct SaveDraftParams {
    content: String,
    filename: PathBuf,
}

impl SaveDraftTool {
    /// Generate a unified diff between old and new content
    fn generate_diff(filepath: &Path, old: &str, new: &str) -> String {
        let diff = TextDiff::from_lines(old, new);
        let mut output = String::new();

        output.push_str(&format!("--- {}\n", filepath.display()));
        output.push_str(&format!("+++ {}\n", filepath.display()));

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                similar::ChangeTag::Delete => "-",
                similar::ChangeTag::Insert => "+",
                similar::ChangeTag::Equal => " ",
            };
            output.push_str(&format!("{}{}", sign, change));
        }

        output
    }
}

#[async_trait::async_trait]
impl Tool for SaveDraftTool {
    fn id(&self) -> &str {
        "save_draft"
    }

    fn description(&self) -> &str {
        "Save the current draft to a file. Creates the file if it doesn't exist, \
         or overwrites it showing a diff of the changes. \
         Only use this after the user explicitly asks to save."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The draft content to save"
                },
                "filename": {
                    "type": "string",
                    "description": "Target filename, e.g. draft.txt (absolute or relative)"
                }
            },
            "required": ["content", "filename"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: SaveDraftParams =
            serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        tracing::debug!(
            working_dir = %ctx.working_dir.display(),
            filename = %params.filename.display(),
            bytes = params.content.len(),
            "tool save_draft start"
        );

        let filepath = if params.filename.is_absolute() {
            params.filename.clone()
        } else {
            ctx.working_dir.join(&params.filename)
        };

        let old_content = if filepath.exists() {
            tokio::fs::read_to_string(&filepath).await.ok()
        } else {
            None
        };

        let diff = if let Some(old) = &old_content {
            Self::generate_diff(&filepath, old, &params.content)
        } else {
            format!("Creating new file: {}\n", filepath.display())
        };

        if let Some(parent) = filepath.parent() {
            if !parent.exists() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return Ok(ToolResult::new(
                        filepath.to_string_lossy(),
                        format!("Failed to save file due to the error: {}", e),
                    )
                    .with_metadata("saved", json!(false)));
                }
            }
        }

        // Write failures are reported back to the model as text so the
        // conversation can continue.
        if let Err(e) = tokio::fs::write(&filepath, &params.content).await {
            tracing::warn!(path = %filepath.display(), error = %e, "save_draft write failed");
            return Ok(ToolResult::new(
                filepath.to_string_lossy(),
                format!("Failed to save file due to the error: {}", e),
            )
            .with_metadata("saved", json!(false)));
        }

        let mut output = "Successfully saved the file content.\n\n".to_string();
        output.push_str(&diff);

        tracing::debug!(
            resolved_path = %filepath.display(),
            existed = old_content.is_some(),
            bytes_written = params.content.len(),
            "tool save_draft done"
        );

        Ok(ToolResult::new(filepath.to_string_lossy(), output)
            .with_metadata("saved", json!(true))
            .with_metadata("existed", json!(old_content.is_some()))
            .with_metadata("bytes_written", json!(params.content.len())))
    }
}
