//! ConversationSession - the guided learning-design conversation
//!
//! Owns the turn history and the running design record. Every user message
//! becomes exactly one chat completion; the reply is mined for structured
//! entries (markers first, classifier as fallback) which the merger applies
//! to the record. All network failures are caught here and turned into
//! user-facing advisories with the history rolled back to its last
//! consistent state.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::extract::{Classifier, parse_markers, strip_markers};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message};
use crate::prompts::{ChatPromptContext, PromptLoader};
use crate::record::{Category, DesignRecord, ExtractedEntry, Merger};

/// User-facing failure classification for a failed chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unauthorized or forbidden - check credentials, not retried
    Credentials,
    /// Endpoint not found - check configuration
    Endpoint,
    /// Provider rate limit still in effect after the single retry
    RateLimited,
    /// Everything else
    Other,
}

impl FailureKind {
    /// Classify an LLM error by status
    pub fn from_error(error: &LlmError) -> Self {
        match error.status() {
            Some(401) | Some(403) => FailureKind::Credentials,
            Some(404) => FailureKind::Endpoint,
            Some(429) => FailureKind::RateLimited,
            _ => FailureKind::Other,
        }
    }

    /// The advisory text shown in place of an assistant reply
    pub fn user_message(&self, detail: &str) -> String {
        match self {
            FailureKind::Credentials => "⚠️ API-nyckeln är ogiltig. Kontrollera dina credentials.".to_string(),
            FailureKind::Endpoint => "⚠️ Kunde inte hitta endpointen. Kontrollera base-url i konfigurationen.".to_string(),
            FailureKind::RateLimited => "⏸️ För många förfrågningar. Vänta en minut och försök igen.".to_string(),
            FailureKind::Other => format!("😅 Något gick fel med AI:n.\n\nFel: {}", detail),
        }
    }
}

/// What one chat turn produced
#[derive(Debug, Clone)]
pub struct SessionReply {
    /// Display text: the assistant reply with marker lines stripped, or a
    /// failure advisory
    pub text: String,

    /// Entries that were actually merged into the record this turn
    pub merged: Vec<ExtractedEntry>,

    /// Record fill state after this turn
    pub filled_count: usize,
    pub is_complete: bool,

    /// Set when the turn failed; the user turn was retracted from history
    pub failure: Option<FailureKind>,
}

/// A guided-conversation session
///
/// Explicitly constructed and explicitly owned; `&mut self` on
/// [`send_message`](Self::send_message) enforces the single in-flight
/// request model.
pub struct ConversationSession {
    id: Uuid,
    llm: Arc<dyn LlmClient>,
    classifier: Classifier,
    merger: Merger,
    prompts: Arc<PromptLoader>,
    config: SessionConfig,
    history: Vec<Message>,
    record: DesignRecord,
    /// Follow-up suggestion from the previous turn's analysis
    pending_hint: Option<String>,
}

impl ConversationSession {
    /// Create a new session
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, config: SessionConfig) -> Self {
        let classifier = Classifier::new(
            llm.clone(),
            prompts.clone(),
            config.min_classify_len,
            config.classify_max_tokens,
        );
        let merger = Merger::new(config.merge_mode, config.quality_filter);
        let id = Uuid::now_v7();

        info!(session_id = %id, "new: session created");

        Self {
            id,
            llm,
            classifier,
            merger,
            prompts,
            config,
            history: Vec::new(),
            record: DesignRecord::default(),
            pending_hint: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The running design record
    pub fn record(&self) -> &DesignRecord {
        &self.record
    }

    /// Conversation history, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Send one user message and await the assistant's reply
    ///
    /// Never panics and never returns an error: failures come back as a
    /// [`SessionReply`] carrying an advisory text and a [`FailureKind`],
    /// with the just-appended user turn retracted so history only ever
    /// contains turns that produced a paired reply.
    pub async fn send_message(&mut self, text: &str) -> SessionReply {
        let text = text.trim();
        debug!(session_id = %self.id, len = text.len(), "send_message: called");

        self.history.push(Message::user(text));
        self.enforce_history_cap();

        let system_prompt = match self.build_system_prompt() {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "send_message: prompt rendering failed");
                self.history.pop();
                return self.failure_reply(FailureKind::Other, &e.to_string());
            }
        };

        let request = CompletionRequest {
            system_prompt,
            messages: self.history.clone(),
            max_tokens: self.config.chat_max_tokens,
        };

        let response = match self.request_completion(request).await {
            Ok(response) => response,
            Err(e) => {
                let kind = FailureKind::from_error(&e);
                warn!(session_id = %self.id, error = %e, ?kind, "send_message: completion failed, retracting turn");
                self.history.pop();
                return self.failure_reply(kind, &e.to_string());
            }
        };

        debug!(
            session_id = %self.id,
            input_tokens = %response.usage.input_tokens,
            output_tokens = %response.usage.output_tokens,
            "send_message: completion received"
        );

        // History keeps the raw reply so the model sees its own
        // confirmations on later turns; only the display text is stripped.
        let reply_text = response.content;
        self.history.push(Message::assistant(&reply_text));
        self.enforce_history_cap();

        let entries = self.extract_entries(text, &reply_text).await;

        let mut merged = Vec::new();
        for entry in entries {
            if self.merger.apply(&mut self.record, &entry) {
                merged.push(entry);
            }
        }

        let filled_count = self.record.filled_count();
        info!(
            session_id = %self.id,
            merged = merged.len(),
            %filled_count,
            "send_message: turn complete"
        );

        SessionReply {
            text: strip_markers(&reply_text),
            merged,
            filled_count,
            is_complete: self.record.is_complete(),
            failure: None,
        }
    }

    /// Clear history and record back to the initial empty state
    pub fn reset(&mut self) {
        info!(session_id = %self.id, "reset: called");
        self.history.clear();
        self.record.clear();
        self.pending_hint = None;
    }

    /// Markers from the reply, or the classifier as fallback
    async fn extract_entries(&mut self, user_text: &str, reply_text: &str) -> Vec<ExtractedEntry> {
        let markers = parse_markers(reply_text);
        if !markers.is_empty() {
            debug!(session_id = %self.id, count = markers.len(), "extract_entries: using markers");
            self.pending_hint = None;
            return markers;
        }

        let analysis = self.classifier.classify(user_text, &self.record, self.current_focus()).await;
        self.pending_hint = if analysis.needs_deepening {
            analysis.suggested_follow_up.clone()
        } else {
            None
        };
        debug!(session_id = %self.id, count = analysis.entries.len(), "extract_entries: classifier fallback");
        analysis.entries
    }

    /// One completion, with a single retry on transient overload
    async fn request_completion(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        match self.llm.complete(request.clone()).await {
            Err(e) if e.is_transient() => {
                warn!(session_id = %self.id, error = %e, "request_completion: transient failure, retrying once");
                tokio::time::sleep(self.config.retry_delay()).await;
                self.llm.complete(request).await
            }
            other => other,
        }
    }

    /// Assemble the system instruction with the live record context
    fn build_system_prompt(&self) -> eyre::Result<String> {
        let lines = self.record.summary_lines();
        let context = ChatPromptContext {
            has_record: !lines.is_empty(),
            record: lines.join("\n"),
            filled_count: self.record.filled_count(),
            total: DesignRecord::TOTAL,
            focus: self
                .current_focus()
                .map(|c| c.focus_name().to_string())
                .unwrap_or_else(|| "nästa steg".to_string()),
            deepening_hint: self.pending_hint.clone(),
            is_complete: self.record.is_complete(),
        };

        self.prompts.render("chat-system", &context)
    }

    /// First unfilled category in dashboard order
    fn current_focus(&self) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| !self.record.is_filled(*c))
    }

    /// Sliding window: keep the newest `history_cap` turns
    fn enforce_history_cap(&mut self) {
        let cap = self.config.history_cap;
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            debug!(session_id = %self.id, %excess, "enforce_history_cap: dropping oldest turns");
            self.history.drain(..excess);
        }
    }

    fn failure_reply(&self, kind: FailureKind, detail: &str) -> SessionReply {
        SessionReply {
            text: kind.user_message(detail),
            merged: Vec::new(),
            filled_count: self.record.filled_count(),
            is_complete: self.record.is_complete(),
            failure: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use std::time::Duration;

    fn session_with(llm: Arc<MockLlmClient>) -> ConversationSession {
        let config = SessionConfig {
            retry_delay_ms: 0,
            ..Default::default()
        };
        ConversationSession::new(llm, Arc::new(PromptLoader::embedded_only()), config)
    }

    fn irrelevant_json() -> String {
        r#"{"isRelevant": false, "categories": [], "needsDeepening": false}"#.to_string()
    }

    #[tokio::test]
    async fn test_marker_reply_skips_classifier() {
        // One scripted reply only: a classifier call would exhaust the script
        let llm = Arc::new(MockLlmClient::with_texts(vec![
            "Bra!\n✅ målgrupp: Säljare på B2B-företag\nVad kämpar de med?",
        ]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Utbildningen är för våra säljare på B2B-sidan").await;

        assert!(reply.failure.is_none());
        assert_eq!(llm.call_count(), 1);
        assert_eq!(reply.merged.len(), 1);
        assert_eq!(session.record().target_audience, "Säljare på B2B-företag");
        assert_eq!(reply.text, "Bra!\nVad kämpar de med?");
    }

    #[tokio::test]
    async fn test_classifier_fallback_when_no_markers() {
        let classification = r#"{
            "isRelevant": true,
            "categories": [
                { "section": "targetAudience", "value": "Säljare på B2B-företag, ca 20 personer", "quality": "concrete" }
            ],
            "needsDeepening": false
        }"#;
        let llm = Arc::new(MockLlmClient::with_texts(vec![
            "Tack! Då förstår jag målgruppen. Vad kämpar de med idag?",
            classification,
        ]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Säljare på B2B-företag, ca 20 personer").await;

        assert_eq!(llm.call_count(), 2);
        assert_eq!(reply.merged.len(), 1);
        assert_eq!(reply.filled_count, 1);
        assert_eq!(session.record().target_audience, "Säljare på B2B-företag, ca 20 personer");
    }

    #[tokio::test]
    async fn test_failed_call_retracts_user_turn() {
        let llm = Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 500,
            message: "internal".to_string(),
        })]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Hej, jag vill skapa en utbildning").await;

        assert_eq!(reply.failure, Some(FailureKind::Other));
        assert!(reply.text.contains("Något gick fel"));
        assert_eq!(session.history().len(), 0);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_retried_once_then_succeeds() {
        let llm = Arc::new(MockLlmClient::new(vec![
            Err(LlmError::ApiError {
                status: 503,
                message: "unavailable".to_string(),
            }),
            Ok(MockLlmClient::text("Hej! Vad vill du skapa?")),
            Ok(MockLlmClient::text(&irrelevant_json())),
        ]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Hej, jag vill skapa en utbildning").await;

        assert!(reply.failure.is_none());
        assert_eq!(reply.text, "Hej! Vad vill du skapa?");
        // 2 chat attempts + 1 classifier call
        assert_eq!(llm.call_count(), 3);
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_second_transient_failure_is_surfaced() {
        let llm = Arc::new(MockLlmClient::new(vec![
            Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(1),
            }),
            Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(1),
            }),
        ]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Hej, jag vill skapa en utbildning").await;

        assert_eq!(reply.failure, Some(FailureKind::RateLimited));
        assert!(reply.text.contains("För många förfrågningar"));
        assert_eq!(llm.call_count(), 2);
        assert_eq!(session.history().len(), 0);
    }

    #[tokio::test]
    async fn test_credential_failure_not_retried() {
        let llm = Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 401,
            message: "unauthorized".to_string(),
        })]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Hej, jag vill skapa en utbildning").await;

        assert_eq!(reply.failure, Some(FailureKind::Credentials));
        assert!(reply.text.contains("API-nyckeln"));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_history_cap_is_a_sliding_window() {
        let mut replies = Vec::new();
        for i in 0..8 {
            replies.push(Ok(MockLlmClient::text(&format!(
                "✅ utmaningar: utmaning nummer {}",
                i
            ))));
        }
        let llm = Arc::new(MockLlmClient::new(replies));
        let config = SessionConfig {
            history_cap: 6,
            retry_delay_ms: 0,
            ..Default::default()
        };
        let mut session = ConversationSession::new(llm, Arc::new(PromptLoader::embedded_only()), config);

        for i in 0..8 {
            session.send_message(&format!("De kämpar också med sak {}", i)).await;
        }

        assert_eq!(session.history().len(), 6);
        // The newest exchange is retained
        assert!(session.history().last().unwrap().content.contains("nummer 7"));
        // The oldest turns are gone
        assert!(!session.history().iter().any(|m| m.content.contains("sak 0")));
    }

    #[tokio::test]
    async fn test_completion_directive_enters_next_request() {
        let all_markers = "✅ målgrupp: Säljare\n✅ utmaningar: Loggar inte samtal\n✅ framgångskriterier: Fler loggade samtal\n✅ lärandemål: Använda CRM\n✅ motivation: Mindre dubbelarbete\n✅ beteenden: Loggar direkt\n✅ scenarion: Kundsamtal på språng";
        let llm = Arc::new(MockLlmClient::with_texts(vec![all_markers, "Klart! Vill du ändra något?"]));
        let mut session = session_with(llm.clone());

        let reply = session.send_message("Här är hela designen i korthet ...").await;
        assert!(reply.is_complete);
        assert_eq!(reply.filled_count, 7);

        session.send_message("Nej, det ser bra ut").await;

        // Chat, then chat + classifier fallback (the second reply has no markers)
        let requests = llm.requests();
        assert_eq!(requests.len(), 3);
        assert!(!requests[0].system_prompt.contains("Alla 7 kategorier är nu fyllda"));
        assert!(requests[1].system_prompt.contains("Alla 7 kategorier är nu fyllda"));
    }

    #[tokio::test]
    async fn test_deepening_hint_reaches_next_request() {
        let classification = r#"{
            "isRelevant": true,
            "categories": [
                { "section": "learningGoals", "value": "Bli bättre på försäljning", "quality": "vague" }
            ],
            "needsDeepening": true,
            "suggestedFollowUp": "Vilken del av försäljningen?"
        }"#;
        let irrelevant = irrelevant_json();
        let llm = Arc::new(MockLlmClient::with_texts(vec![
            "Okej! Berätta mer.",
            classification,
            "Visst!",
            irrelevant.as_str(),
        ]));
        let mut session = session_with(llm.clone());

        session.send_message("De ska bli bättre på försäljning").await;
        session.send_message("Vad menar du?").await;

        let requests = llm.requests();
        // Request order: chat, classify, chat, classify
        assert!(requests[2].system_prompt.contains("Vilken del av försäljningen?"));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let llm = Arc::new(MockLlmClient::with_texts(vec!["✅ målgrupp: Säljare"]));
        let mut session = session_with(llm);

        session.send_message("Det är för säljarna").await;
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.record().filled_count(), 1);

        session.reset();

        assert!(session.history().is_empty());
        assert_eq!(session.record().filled_count(), 0);
    }

    #[test]
    fn test_failure_kind_from_error() {
        let err = LlmError::ApiError {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(FailureKind::from_error(&err), FailureKind::Credentials);

        let err = LlmError::ApiError {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(FailureKind::from_error(&err), FailureKind::Endpoint);

        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert_eq!(FailureKind::from_error(&err), FailureKind::RateLimited);

        let err = LlmError::InvalidResponse("bad".to_string());
        assert_eq!(FailureKind::from_error(&err), FailureKind::Other);
    }

    #[test]
    fn test_other_failure_message_includes_detail() {
        let msg = FailureKind::Other.user_message("API error 500: boom");
        assert!(msg.contains("API error 500: boom"));
    }
}
