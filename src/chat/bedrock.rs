// Chat-turn bookkeeping and Bedrock invocation (Anthropic messages payload).

use aws_sdk_bedrockruntime::primitives::Blob;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::prompts::PromptLibrary;
use crate::models::{BucketedMetrics, ServiceKind};

/// One caller-supplied conversation turn (POST /talk log entries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct Turn {
    role: String,
    content: String,
}

/// Ordered message history for a single model invocation.
#[derive(Debug, Default)]
pub struct ChatSession {
    history: Vec<Turn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: &str, content: impl Into<String>) {
        self.history.push(Turn {
            role: role.to_string(),
            content: content.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Anthropic-on-Bedrock request body.
    pub fn anthropic_payload(&self, max_tokens: u32) -> serde_json::Value {
        serde_json::json!({
            "messages": self.history,
            "max_tokens": max_tokens,
            "anthropic_version": "bedrock-2023-05-31",
        })
    }
}

pub struct PersonaChat {
    client: aws_sdk_bedrockruntime::Client,
    prompts: PromptLibrary,
    model_id: String,
    max_tokens: u32,
}

impl PersonaChat {
    pub fn new(
        client: aws_sdk_bedrockruntime::Client,
        prompts: PromptLibrary,
        model_id: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            prompts,
            model_id,
            max_tokens,
        }
    }

    /// Build the persona session: persona prompt, the caller's replayed log,
    /// then the resource's windowed metrics as a final context turn.
    pub fn session(
        &self,
        kind: ServiceKind,
        log: &[ChatMessage],
        metrics: &BucketedMetrics,
    ) -> anyhow::Result<ChatSession> {
        let mut session = ChatSession::new();
        session.push("user", self.prompts.persona(kind));
        for entry in log {
            session.push(&entry.role, entry.message.clone());
        }
        let metrics_json = serde_json::to_string(metrics)?;
        session.push(
            "user",
            format!(
                "----------metrics_data: {metrics_json}\n\nUse this metrics data when the conversation calls for it.----------"
            ),
        );
        Ok(session)
    }

    #[instrument(skip(self, log, metrics), fields(operation = "talk", kind = kind.as_str()))]
    pub async fn talk(
        &self,
        kind: ServiceKind,
        log: &[ChatMessage],
        metrics: &BucketedMetrics,
    ) -> anyhow::Result<String> {
        let session = self.session(kind, log, metrics)?;
        self.invoke(&session).await
    }

    async fn invoke(&self, session: &ChatSession) -> anyhow::Result<String> {
        let payload = session.anthropic_payload(self.max_tokens);
        let resp = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(serde_json::to_vec(&payload)?))
            .send()
            .await?;

        let body: serde_json::Value = serde_json::from_slice(resp.body().as_ref())?;
        body.pointer("/content/0/text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("unexpected model response shape: {body}"))
    }
}
