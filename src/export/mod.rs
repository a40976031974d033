//! Document export
//!
//! Renders the finished design record as a "High Level Design" markdown
//! document and writes timestamped files. The long-form specification is
//! generated by the LLM from the record and exported the same way.
//! Pagination and layout belong to whatever consumes the files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{Context, Result};
use tracing::info;

use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message};
use crate::prompts::{PromptLoader, SpecifyContext};
use crate::record::{Category, DesignRecord};

/// Placeholder for categories without content yet
const EMPTY_SECTION: &str = "(Inte ifyllt ännu)";

/// Section order and headings of the exported document
const SECTIONS: [(Category, &str); 7] = [
    (Category::Challenges, "Vår nuvarande utmaning är..."),
    (Category::Success, "Denna utbildning kommer ses som framgångsrik om..."),
    (Category::TargetAudience, "Målgruppen"),
    (Category::LearningGoals, "Vad ska deltagarna lära sig?"),
    (Category::Motivation, "Vad motiverar dem att lära sig om ämnet?"),
    (Category::Behaviors, "Vilka beteenden vill vi se mer av?"),
    (
        Category::Scenarios,
        "Vilka konkreta scenarion är det deltagarna har svårt för idag?",
    ),
];

/// Render the record as a High Level Design document
pub fn render_design(record: &DesignRecord) -> String {
    let mut md = String::new();

    md.push_str("# High Level Design\n\n");
    md.push_str("_Din utbildningsdesign_\n");

    for (category, heading) in SECTIONS {
        md.push_str(&format!("\n## {}\n\n", heading));

        match record.seq(category) {
            None => {
                if record.is_filled(category) {
                    md.push_str(&format!("{}\n", record.target_audience));
                } else {
                    md.push_str(&format!("{}\n", EMPTY_SECTION));
                }
            }
            Some(seq) if !seq.is_empty() => {
                for item in seq {
                    md.push_str(&format!("- {}\n", item));
                }
            }
            Some(_) => {
                md.push_str(&format!("{}\n", EMPTY_SECTION));
            }
        }
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M");
    md.push_str(&format!("\n---\n\nSkapad: {} · designcoach\n", timestamp));

    md
}

/// Write the design document to a timestamped file
pub fn export_design(record: &DesignRecord, dir: &Path) -> Result<PathBuf> {
    let content = render_design(record);
    write_document(&content, dir, "high-level-design")
}

/// Generate the long-form specification text from the record
///
/// Completeness is the caller's choice; unfilled categories are rendered as
/// such and the model works with what it gets.
pub async fn generate_specification(
    llm: &Arc<dyn LlmClient>,
    prompts: &PromptLoader,
    record: &DesignRecord,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let context = SpecifyContext {
        record: render_record_overview(record),
    };
    let instruction = prompts
        .render("specify", &context)
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    let request = CompletionRequest {
        system_prompt: instruction,
        messages: vec![Message::user("Skriv utbildningsspecifikationen nu.")],
        max_tokens,
    };

    let CompletionResponse { content, usage } = llm.complete(request).await?;
    info!(
        input_tokens = %usage.input_tokens,
        output_tokens = %usage.output_tokens,
        "generate_specification: done"
    );
    Ok(content)
}

/// Write a generated specification to a timestamped file
pub fn export_specification(text: &str, dir: &Path) -> Result<PathBuf> {
    write_document(text, dir, "utbildningsspecifikation")
}

/// All categories with labels, unfilled ones marked, for the prompt
fn render_record_overview(record: &DesignRecord) -> String {
    Category::ALL
        .iter()
        .map(|c| {
            let value = record.display_value(*c).unwrap_or_else(|| EMPTY_SECTION.to_string());
            format!("{}: {}", c.label(), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_document(content: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).context("Failed to create export directory")?;

    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{}-{}.md", stem, timestamp));

    std::fs::write(&path, content).context("Failed to write export file")?;
    info!(path = %path.display(), "write_document: exported");

    Ok(path)
}
