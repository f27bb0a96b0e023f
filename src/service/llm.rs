//! Shared LLM client and interaction utilities
//!
//! Provides a common interface for OpenAI-compatible API interactions used by
//! the triage and chat services. The endpoint is fixed at startup; pointing
//! the platform at an alternate provider is a configuration change, not a
//! code path.

use rig::providers::openai;

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key.
    ///
    /// When `base_url` is set the client targets that OpenAI-compatible
    /// endpoint instead of the default OpenAI API.
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self, String> {
        let client = match base_url {
            Some(url) => openai::Client::builder(api_key).base_url(url).build(),
            None => Ok(openai::Client::new(api_key)),
        }
        .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying OpenAI client
    /// Use this to create extractors or agents with custom configuration
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
