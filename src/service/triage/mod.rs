//! Severity triage pipeline
//!
//! Classifies incident descriptions as low/medium/high. The primary path is
//! an LLM call returning a structured severity judgment; on any failure the
//! deterministic keyword fallback takes over. The pipeline itself never
//! fails: a persisted report must always carry a severity, even when every
//! upstream dependency is down.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Severity, TriageConfig};
use crate::service::llm::LlmClient;

pub mod error;
pub mod fallback;
pub mod prompts;

pub use error::TriageError;

/// Environment variable for the triage model (defaults to gpt-4o-mini if not set)
const ENV_TRIAGE_MODEL: &str = "TRIAGE_MODEL";

/// Default model for severity triage
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Structured response requested from the language model.
///
/// `severity` stays a plain string here so out-of-enum values (a model
/// answering "critical") surface as a validation failure on our side rather
/// than a silent coercion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedTriage {
    #[schemars(description = "Severity judgment: exactly one of low, medium, high")]
    pub severity: String,

    #[schemars(description = "Confidence in the severity judgment, 0.0 to 1.0")]
    pub confidence: Option<f64>,

    #[schemars(description = "One or two factual sentences explaining the judgment")]
    pub notes: Option<String>,
}

/// Validated output of the primary classifier
#[derive(Debug, Clone, PartialEq)]
pub struct AiTriage {
    pub severity: Severity,
    pub confidence: Option<f64>,
    pub notes: Option<String>,
}

impl AiTriage {
    /// Validate an extracted payload against the three-value severity enum.
    /// An unrecognized severity is a parse failure, handled like any other
    /// primary-path failure.
    pub fn from_extracted(extracted: ExtractedTriage) -> Result<Self, TriageError> {
        let severity = Severity::parse(&extracted.severity)
            .ok_or(TriageError::InvalidSeverity(extracted.severity))?;

        Ok(Self {
            severity,
            confidence: extracted.confidence,
            notes: extracted.notes,
        })
    }
}

/// Primary severity classifier seam.
///
/// Concrete providers are selected once at startup from configuration; the
/// pipeline only sees this interface.
#[async_trait]
pub trait SeverityClassifier: Send + Sync {
    async fn classify(&self, description: &str) -> Result<AiTriage, TriageError>;
}

/// OpenAI-compatible completion provider for severity triage
pub struct OpenAiClassifier {
    llm_client: LlmClient,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl OpenAiClassifier {
    /// Creates a new classifier over a shared LLM client.
    ///
    /// Optionally uses the TRIAGE_MODEL env var (defaults to gpt-4o-mini).
    pub fn new(llm_client: LlmClient, config: &TriageConfig) -> Self {
        let model = std::env::var(ENV_TRIAGE_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(
            model = %model,
            temperature = config.temperature,
            timeout_secs = config.timeout_secs,
            "Severity classifier initialized"
        );

        Self {
            llm_client,
            model,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl SeverityClassifier for OpenAiClassifier {
    async fn classify(&self, description: &str) -> Result<AiTriage, TriageError> {
        let start_time = std::time::Instant::now();

        let prompt = prompts::build_triage_prompt(description);

        // Create extractor using the shared LLM client. A single attempt,
        // bounded by the configured timeout; no retries against a degraded
        // provider.
        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<ExtractedTriage>(&self.model)
            .preamble(prompts::TRIAGE_SYSTEM_PROMPT)
            .temperature(self.temperature)
            .build();

        let extracted = match tokio::time::timeout(self.timeout, extractor.extract(&prompt)).await
        {
            Ok(Ok(result)) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    "Severity classification completed"
                );
                result
            }
            Ok(Err(e)) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "Severity classification call failed"
                );
                return Err(TriageError::CompletionFailed(e.to_string()));
            }
            Err(_) => {
                tracing::error!(
                    model = %self.model,
                    timeout_secs = self.timeout.as_secs(),
                    "Severity classification timed out"
                );
                return Err(TriageError::Timeout(self.timeout.as_secs()));
            }
        };

        AiTriage::from_extracted(extracted)
    }
}

/// Final classification attached to a report before it is persisted.
///
/// Invariant: `ai_analyzed == false` implies confidence and notes are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageOutcome {
    pub severity: Severity,
    pub ai_analyzed: bool,
    pub ai_confidence: Option<f64>,
    pub ai_notes: Option<String>,
}

/// Combined primary/fallback triage pipeline
pub struct TriageService {
    classifier: Option<Arc<dyn SeverityClassifier>>,
}

impl TriageService {
    /// Create the pipeline. With no classifier configured every call takes
    /// the keyword fallback path.
    pub fn new(classifier: Option<Arc<dyn SeverityClassifier>>) -> Self {
        if classifier.is_none() {
            tracing::warn!("No primary classifier configured, triage will use keyword fallback");
        }
        Self { classifier }
    }

    /// Classify a description. Never fails; callers enforce input validation
    /// (minimum description length) before invoking the pipeline.
    pub async fn classify(&self, description: &str) -> TriageOutcome {
        let Some(classifier) = &self.classifier else {
            return Self::fallback_outcome(description);
        };

        match classifier.classify(description).await {
            Ok(ai) => TriageOutcome {
                severity: ai.severity,
                ai_analyzed: true,
                ai_confidence: Some(ai.confidence.unwrap_or(0.0)),
                ai_notes: Some(ai.notes.unwrap_or_default()),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Primary classifier failed, using keyword fallback");
                Self::fallback_outcome(description)
            }
        }
    }

    fn fallback_outcome(description: &str) -> TriageOutcome {
        TriageOutcome {
            severity: fallback::classify_keywords(description),
            ai_analyzed: false,
            ai_confidence: None,
            ai_notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifier returning a canned result, for pipeline tests
    struct StubClassifier {
        result: fn() -> Result<AiTriage, TriageError>,
    }

    #[async_trait]
    impl SeverityClassifier for StubClassifier {
        async fn classify(&self, _description: &str) -> Result<AiTriage, TriageError> {
            (self.result)()
        }
    }

    fn service_with(result: fn() -> Result<AiTriage, TriageError>) -> TriageService {
        TriageService::new(Some(Arc::new(StubClassifier { result })))
    }

    #[tokio::test]
    async fn ai_success_maps_all_fields() {
        let service = service_with(|| {
            Ok(AiTriage {
                severity: Severity::High,
                confidence: Some(0.9),
                notes: Some("explicit threat".to_string()),
            })
        });

        let outcome = service.classify("He said he would kill me").await;

        assert_eq!(outcome.severity, Severity::High);
        assert!(outcome.ai_analyzed);
        assert_eq!(outcome.ai_confidence, Some(0.9));
        assert_eq!(outcome.ai_notes.as_deref(), Some("explicit threat"));
    }

    #[tokio::test]
    async fn ai_success_without_optionals_defaults_confidence_and_notes() {
        let service = service_with(|| {
            Ok(AiTriage {
                severity: Severity::Low,
                confidence: None,
                notes: None,
            })
        });

        let outcome = service.classify("nothing serious").await;

        assert!(outcome.ai_analyzed);
        assert_eq!(outcome.ai_confidence, Some(0.0));
        assert_eq!(outcome.ai_notes.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn ai_failure_matches_fallback_output() {
        let text = "They keep bullying me at school";
        let service =
            service_with(|| Err(TriageError::CompletionFailed("connection refused".into())));

        let outcome = service.classify(text).await;

        assert_eq!(outcome.severity, fallback::classify_keywords(text));
        assert!(!outcome.ai_analyzed);
        assert!(outcome.ai_confidence.is_none());
        assert!(outcome.ai_notes.is_none());
    }

    #[tokio::test]
    async fn ai_timeout_falls_back() {
        let service = service_with(|| Err(TriageError::Timeout(10)));

        let outcome = service.classify("He said he would kill me").await;

        assert_eq!(outcome.severity, Severity::High);
        assert!(!outcome.ai_analyzed);
    }

    #[tokio::test]
    async fn missing_classifier_falls_back() {
        let service = TriageService::new(None);

        let outcome = service.classify("They keep bullying me at school").await;

        assert_eq!(outcome.severity, Severity::Medium);
        assert!(!outcome.ai_analyzed);
        assert!(outcome.ai_confidence.is_none());
    }

    #[test]
    fn out_of_enum_severity_is_a_parse_failure() {
        let extracted = ExtractedTriage {
            severity: "critical".to_string(),
            confidence: Some(0.8),
            notes: None,
        };
        assert!(matches!(
            AiTriage::from_extracted(extracted),
            Err(TriageError::InvalidSeverity(_))
        ));
    }

    #[tokio::test]
    async fn invalid_severity_from_model_falls_back() {
        let service = service_with(|| {
            AiTriage::from_extracted(ExtractedTriage {
                severity: "critical".to_string(),
                confidence: Some(0.8),
                notes: Some("made-up level".to_string()),
            })
        });

        let outcome = service.classify("Someone posted an embarrassing photo of me").await;

        assert_eq!(outcome.severity, Severity::Low);
        assert!(!outcome.ai_analyzed);
        assert!(outcome.ai_notes.is_none());
    }
}
