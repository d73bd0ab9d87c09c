// Conversation orchestrator for the booking assistant
// One user turn = model call, tool round-trips as requested, final text reply

use serde_json::Value;
use thiserror::Error;

use crate::agent::tool_executor::{booking_tools, BookingToolkit, ToolError};
use crate::agent::transcript::TranscriptStore;
use crate::openai_client::{ChatMessage, ModelError, OpenAiClient};

/// Upper bound on tool round-trips per user turn. A model still asking for
/// tools after this many rounds gets one last completion without schemas to
/// force a plain-text answer.
const MAX_TOOL_ROUNDS: usize = 3;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Model call failed: {0}")]
    Model(#[from] ModelError),
    #[error("Tool execution failed: {0}")]
    Tool(#[from] ToolError),
    #[error("Malformed tool arguments: {0}")]
    ToolArguments(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ConciergeAgent {
    client: OpenAiClient,
    toolkit: BookingToolkit,
    transcripts: TranscriptStore,
}

impl ConciergeAgent {
    pub fn new(client: OpenAiClient, toolkit: BookingToolkit, transcripts: TranscriptStore) -> Self {
        Self {
            client,
            toolkit,
            transcripts,
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Runs one user turn to completion and returns the assistant's answer.
    ///
    /// The user message, any assistant tool-call requests and their results
    /// are appended to the user's transcript in API order. The final text
    /// answer itself is not recorded. Errors abort the turn mid-append, so a
    /// failed turn can leave the transcript without matching tool results.
    pub async fn run_turn(&self, user_id: &str, message: &str) -> Result<String, AgentError> {
        self.transcripts.append(user_id, ChatMessage::user(message)).await;

        let tools = booking_tools();

        for round in 0..MAX_TOOL_ROUNDS {
            let history = self.transcripts.history(user_id).await;
            let reply = self.client.chat_completion(history, Some(tools.clone())).await?;

            let tool_calls = match reply.tool_calls.clone() {
                Some(calls) if !calls.is_empty() => calls,
                _ => return Ok(reply.content.unwrap_or_default()),
            };

            tracing::debug!(
                "Round {}: model requested {} tool call(s) for user {}",
                round + 1,
                tool_calls.len(),
                user_id
            );
            self.transcripts.append(user_id, reply).await;

            for call in &tool_calls {
                tracing::info!("🔧 Executing tool: {}", call.function.name);
                let args: Value = serde_json::from_str(&call.function.arguments)?;
                let result = self.toolkit.dispatch(&call.function.name, &args).await?;
                let content = serde_json::to_string(&result)?;
                self.transcripts
                    .append(
                        user_id,
                        ChatMessage::tool_result(&call.id, &call.function.name, content),
                    )
                    .await;
            }
        }

        // Tool budget exhausted: ask once more with no schemas attached.
        tracing::warn!(
            "Tool round limit ({}) reached for user {}, forcing a text answer",
            MAX_TOOL_ROUNDS,
            user_id
        );
        let history = self.transcripts.history(user_id).await;
        let reply = self.client.chat_completion(history, None).await?;
        Ok(reply.content.unwrap_or_default())
    }
}
