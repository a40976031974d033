//! designcoach - guided conversations for learning design
//!
//! designcoach walks a user through designing a training: a chat session
//! backed by an LLM fills a seven-category design record (target audience,
//! challenges, success criteria, learning goals, motivation, behaviors,
//! scenarios) and exports the result as a formatted document.
//!
//! # Core flow
//!
//! Every user message becomes exactly one chat completion. The assistant's
//! reply is mined for structured entries: explicit `✅ kategori: värde`
//! markers are parsed locally, and when a reply carries none, a second LLM
//! call classifies the user's turn instead. Accepted entries are merged
//! into the record under an explicit policy, and once all seven categories
//! are filled the next request carries a closing directive.
//!
//! # Modules
//!
//! - [`record`] - the design record, category vocabulary, and merger
//! - [`extract`] - marker parser and LLM classifier
//! - [`session`] - the conversation session owning history and record
//! - [`llm`] - LLM client trait and provider implementations
//! - [`prompts`] - Handlebars instruction templates
//! - [`export`] - document rendering and specification generation
//! - [`config`] - configuration types and loading
//! - [`repl`] - interactive chat front end

pub mod cli;
pub mod config;
pub mod export;
pub mod extract;
pub mod llm;
pub mod prompts;
pub mod record;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ExportConfig, LlmConfig, SessionConfig};
pub use extract::{Analysis, Classifier, parse_markers, strip_markers};
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, OpenAIClient, Role,
    TokenUsage, create_client,
};
pub use prompts::PromptLoader;
pub use record::{Category, DesignRecord, ExtractedEntry, MergeMode, Merger, Quality, QualityFilter};
pub use repl::ChatRepl;
pub use session::{ConversationSession, FailureKind, SessionReply};
