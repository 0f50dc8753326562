//! Document drafter: a tool-using chat agent for reading and saving drafts.
//!
//! The loop is deliberately small: call the model; if the reply carries tool
//! calls, execute them and call the model again with the results; otherwise
//! the turn is complete. Saving only ever happens through an explicit model
//! tool-call, and the system prompt gates that on an explicit user request.

use crate::llm::types::{Message, ToolCall};
use crate::llm::ChatModel;
use crate::tool::base::ToolContext;
use crate::tool::ToolRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub const DRAFTER_SYSTEM_PROMPT: &str = "\
You are an AI assistant designed to help users read, create, edit, and update drafts through natural conversation.
You only have access to the tools: read_document and save_draft.

!! Important Rule !!
Never use the save_draft tool unless the user gives an explicit instruction to save. Wait for clear commands like:
- \"Save this\"
- \"Please save the draft\"
- \"You can now use the save_draft tool\"
- \"Store this version\"

Behavior:
- Begin by asking open-ended questions to understand the user's intent.
- Collaborate step-by-step to generate or revise content.
- After each update, ask if the user is satisfied or wants changes.

Guidelines:
- Never assume the user wants to save.
- Clarify vague statements like \"Looks good\" by asking: \"Would you like me to save this draft now?\"
- You may track versions conversationally but must wait for explicit permission before saving.";

#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Assistant reply text for this round.
    AssistantMessage(String),
    /// Tool call requested by the assistant.
    ToolUse { name: String },
    /// A tool finished execution (success or error).
    ToolResult {
        tool_name: String,
        content: String,
        is_error: bool,
    },
    /// The whole user turn is complete (no more follow-up tool calls pending).
    TurnComplete,
    /// Fatal error for the current turn.
    Error(String),
}

/// Drafter agent runner: manages conversation state and tool execution.
///
/// This is UI-agnostic: it emits `AgentEvent`s that any UI can consume.
pub struct DrafterAgent {
    model: Arc<dyn ChatModel>,
    tool_registry: Arc<ToolRegistry>,
    working_dir: PathBuf,
    session_id: String,
    agent_name: String,
    conversation: Arc<Mutex<Vec<Message>>>,
}

impl DrafterAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            tool_registry: Arc::new(ToolRegistry::new()),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            session_id: "draft_session_1".to_string(),
            agent_name: "drafter".to_string(),
            conversation: Arc::new(Mutex::new(vec![Message::system(DRAFTER_SYSTEM_PROMPT)])),
        }
    }

    /// Submit a user message and start the agent turn.
    ///
    /// Returns a receiver of `AgentEvent`s for UI consumption.
    pub fn start_turn(&self, user_text: String) -> mpsc::UnboundedReceiver<AgentEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        let model = self.model.clone();
        let registry = self.tool_registry.clone();
        let working_dir = self.working_dir.clone();
        let session_id = self.session_id.clone();
        let agent_name = self.agent_name.clone();
        let conversation = self.conversation.clone();

        tokio::spawn(async move {
            {
                let mut convo = conversation.lock().await;
                convo.push(Message::user(user_text));
            }

            let mut round: u64 = 0;

            loop {
                round += 1;

                let conversation_snapshot = { conversation.lock().await.clone() };
                let tool_definitions = Some(registry.list_tool_definitions());

                let response = match model.chat(conversation_snapshot, tool_definitions).await {
                    Ok(response) => response,
                    Err(e) => {
                        let _ = tx.send(AgentEvent::Error(e.to_string()));
                        let _ = tx.send(AgentEvent::TurnComplete);
                        return;
                    }
                };

                // Persist assistant message to conversation.
                {
                    let mut convo = conversation.lock().await;
                    convo.push(Message::assistant_with_tool_calls(
                        response.content.clone(),
                        response.tool_calls.clone(),
                    ));
                }

                if !response.content.is_empty() {
                    if tx
                        .send(AgentEvent::AssistantMessage(response.content.clone()))
                        .is_err()
                    {
                        return;
                    }
                }

                // No tools => done.
                if response.tool_calls.is_empty() {
                    let _ = tx.send(AgentEvent::TurnComplete);
                    return;
                }

                // Execute tools sequentially and append their results.
                for tool_call in response.tool_calls {
                    let tool_name = tool_call.function.name.clone();

                    if tx
                        .send(AgentEvent::ToolUse {
                            name: tool_name.clone(),
                        })
                        .is_err()
                    {
                        return;
                    }

                    let (result_content, is_error) = execute_tool(
                        &registry,
                        &tool_call,
                        &session_id,
                        round,
                        &agent_name,
                        &working_dir,
                    )
                    .await;

                    let _ = tx.send(AgentEvent::ToolResult {
                        tool_name: tool_name.clone(),
                        content: result_content.clone(),
                        is_error,
                    });

                    let mut convo = conversation.lock().await;
                    convo.push(Message::tool_result(tool_name, result_content));
                }

                // Continue loop: call the model again with updated conversation.
            }
        });

        rx
    }
}

async fn execute_tool(
    registry: &ToolRegistry,
    tool_call: &ToolCall,
    session_id: &str,
    round: u64,
    agent_name: &str,
    working_dir: &Path,
) -> (String, bool) {
    let tool = match registry.get(&tool_call.function.name) {
        Some(tool) => tool.clone(),
        None => {
            return (
                format!("Tool '{}' not found", tool_call.function.name),
                true,
            );
        }
    };

    let ctx = ToolContext::new(
        session_id,
        format!("{}_msg_{}", session_id, round),
        agent_name,
        working_dir.to_path_buf(),
    );

    match tool.execute(tool_call.function.arguments.clone(), &ctx).await {
        Ok(tool_result) => (
            format!("Tool: {}\nOutput:\n{}", tool_result.title, tool_result.output),
            false,
        ),
        Err(e) => (format!("Tool execution failed: {}", e), true),
    }
}
