//! Conversational assistant with severity-advisory fallback
//!
//! On the happy path the model's free-form reply is returned verbatim. When
//! the completion call fails for any reason, the keyword classifier produces
//! a templated severity advisory instead; the caller still gets a 200 with
//! the provenance in `source`.

use std::time::Duration;

use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::TriageConfig;
use crate::service::llm::LlmClient;
use crate::service::triage::fallback;

/// Environment variable for the chat model (defaults to gpt-4o-mini if not set)
const ENV_CHAT_MODEL: &str = "CHAT_MODEL";

/// Default model for the assistant
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// System prompt for the assistant
const CHAT_SYSTEM_PROMPT: &str = r#"You are a supportive assistant on an anti-bullying reporting platform.

People write to you about bullying they experience or witness. Respond with
empathy, keep replies short, and suggest concrete next steps such as talking
to a trusted adult, saving evidence, or filing a report on the platform.
Never dismiss what the person describes. If a message mentions violence or
self-harm, urge them to contact a trusted adult or local emergency services."#;

/// Which path produced the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Ai,
    Fallback,
}

/// Assistant reply with provenance
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
    pub source: ReplySource,
}

/// Assistant service
pub struct ChatService {
    llm_client: Option<LlmClient>,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl ChatService {
    /// Creates the assistant. With no LLM client configured every message
    /// gets the severity-advisory fallback.
    pub fn new(llm_client: Option<LlmClient>, config: &TriageConfig) -> Self {
        let model = std::env::var(ENV_CHAT_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        if llm_client.is_none() {
            tracing::warn!("No LLM client configured, chat will use severity advisories");
        }

        Self {
            llm_client,
            model,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Produce a reply for an inbound message. Never fails.
    pub async fn reply(&self, message: &str) -> ChatReply {
        let Some(llm_client) = &self.llm_client else {
            return Self::fallback_reply(message);
        };

        let start_time = std::time::Instant::now();

        let agent = llm_client
            .openai_client()
            .agent(&self.model)
            .preamble(CHAT_SYSTEM_PROMPT)
            .temperature(self.temperature)
            .build();

        match tokio::time::timeout(self.timeout, agent.prompt(message)).await {
            Ok(Ok(reply)) => {
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    "Chat completion succeeded"
                );
                ChatReply {
                    reply,
                    source: ReplySource::Ai,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    model = %self.model,
                    error = %e,
                    "Chat completion failed, using severity advisory"
                );
                Self::fallback_reply(message)
            }
            Err(_) => {
                tracing::warn!(
                    model = %self.model,
                    timeout_secs = self.timeout.as_secs(),
                    "Chat completion timed out, using severity advisory"
                );
                Self::fallback_reply(message)
            }
        }
    }

    fn fallback_reply(message: &str) -> ChatReply {
        let severity = fallback::classify_keywords(message);
        ChatReply {
            reply: fallback::advisory_message(severity),
            source: ReplySource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    #[tokio::test]
    async fn missing_client_yields_fallback_advisory() {
        let service = ChatService::new(None, &TriageConfig::default());

        let reply = service.reply("He said he would kill me").await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(
            reply.reply,
            fallback::advisory_message(Severity::High)
        );
    }

    #[tokio::test]
    async fn fallback_advisory_tracks_message_severity() {
        let service = ChatService::new(None, &TriageConfig::default());

        let low = service.reply("I had a rough day at school").await;
        assert!(low.reply.contains("**LOW severity**"));

        let medium = service.reply("They keep bullying me at school").await;
        assert!(medium.reply.contains("**MEDIUM severity**"));
    }

    #[test]
    fn reply_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReplySource::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(serde_json::to_string(&ReplySource::Ai).unwrap(), "\"ai\"");
    }
}
