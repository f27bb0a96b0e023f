pub mod chat;
pub mod llm;
pub mod triage;

pub use chat::{ChatReply, ChatService, ReplySource};
pub use llm::LlmClient;
pub use triage::{OpenAiClassifier, SeverityClassifier, TriageOutcome, TriageService};
