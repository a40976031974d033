//! Category classifier - LLM-backed analysis of user turns
//!
//! Sends the latest user turn plus the running record to the LLM with a
//! fixed instruction and parses the returned JSON into typed entries. Every
//! failure mode degrades to an empty analysis: a classification problem must
//! never break the conversation itself.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::{ClassifyContext, PromptLoader};
use crate::record::{Category, DesignRecord, ExtractedEntry, Quality};

/// System line for classification calls; the rendered instruction template
/// goes in the user message, matching how the chat model was trained to see
/// analysis tasks
const CLASSIFY_SYSTEM_PROMPT: &str =
    "Du är en expert på att analysera, filtrera och kategorisera pedagogisk information. \
     Svara ENDAST med valid JSON.";

/// Result of classifying one user turn
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Entries eligible for merging
    pub entries: Vec<ExtractedEntry>,
    /// The turn was usable but thin; a follow-up would help
    pub needs_deepening: bool,
    /// Suggested follow-up question when deepening is needed
    pub suggested_follow_up: Option<String>,
}

/// LLM-backed categorizer for user turns
pub struct Classifier {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    min_len: usize,
    max_tokens: u32,
}

impl Classifier {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, min_len: usize, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            min_len,
            max_tokens,
        }
    }

    /// Classify one user turn against the running record
    ///
    /// Messages shorter than the minimum length are skipped without a call;
    /// greetings and noise are not worth a classification request.
    pub async fn classify(&self, text: &str, record: &DesignRecord, focus: Option<Category>) -> Analysis {
        let text = text.trim();
        if text.chars().count() < self.min_len {
            debug!(len = text.chars().count(), "classify: message below minimum length, skipping");
            return Analysis::default();
        }

        let context = ClassifyContext {
            message: text.to_string(),
            record: render_record(record),
            focus: focus.map(|c| c.focus_name().to_string()).unwrap_or_else(|| "nästa steg".to_string()),
        };

        let instruction = match self.prompts.render("classify", &context) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(error = %e, "classify: failed to render instruction template");
                return Analysis::default();
            }
        };

        let request = CompletionRequest {
            system_prompt: CLASSIFY_SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(instruction)],
            max_tokens: self.max_tokens,
        };

        let response = match self.llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "classify: LLM call failed, returning no entries");
                return Analysis::default();
            }
        };

        parse_analysis(&response.content)
    }
}

/// Render the record for the instruction context
fn render_record(record: &DesignRecord) -> String {
    let lines = record.summary_lines();
    if lines.is_empty() {
        "Ingen data än".to_string()
    } else {
        lines.join("\n")
    }
}

/// Parse the classification reply into a typed analysis
///
/// Fails open: anything that does not validate yields an empty analysis.
fn parse_analysis(content: &str) -> Analysis {
    let Some(json) = extract_json_object(content) else {
        warn!("parse_analysis: no JSON object in reply");
        return Analysis::default();
    };

    let output: ClassifyOutput = match serde_json::from_str(json) {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "parse_analysis: reply did not match schema");
            return Analysis::default();
        }
    };

    if !output.is_relevant {
        debug!(reason = ?output.reason, "parse_analysis: turn judged irrelevant");
        return Analysis::default();
    }

    let entries = output
        .categories
        .into_iter()
        .filter_map(|raw| {
            let Some(category) = Category::from_key(&raw.section) else {
                warn!(section = %raw.section, "parse_analysis: unknown section key, dropping entry");
                return None;
            };
            let value = raw.value.trim();
            if value.is_empty() {
                return None;
            }
            Some(ExtractedEntry::new(category, value, raw.quality))
        })
        .collect();

    Analysis {
        entries,
        needs_deepening: output.needs_deepening,
        suggested_follow_up: output.suggested_follow_up.filter(|s| !s.trim().is_empty()),
    }
}

/// Slice out the outermost `{...}` span
///
/// Models wrap JSON in prose or code fences often enough that taking the
/// first-to-last brace span is required before strict parsing.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

// Classification reply schema

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput {
    #[serde(default)]
    is_relevant: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    categories: Vec<RawEntry>,
    #[serde(default)]
    needs_deepening: bool,
    #[serde(default)]
    suggested_follow_up: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    section: String,
    value: String,
    quality: Quality,
}
