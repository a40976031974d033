//! Prompt templates
//!
//! Handlebars templates with embedded defaults and file overrides. Override
//! lookup order per template: `.designcoach/prompts/{name}.pmt`, then
//! `prompts/{name}.pmt`, then the embedded fallback.

mod embedded;

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

/// Context for the chat system instruction
#[derive(Debug, Clone, Serialize)]
pub struct ChatPromptContext {
    /// Any category filled yet
    pub has_record: bool,
    /// `key: value` lines for the filled categories
    pub record: String,
    pub filled_count: usize,
    /// Fixed category total
    pub total: usize,
    /// Swedish phrase for the current conversation focus
    pub focus: String,
    /// Follow-up suggestion from the previous turn's analysis
    pub deepening_hint: Option<String>,
    /// All categories filled; include the closing directive
    pub is_complete: bool,
}

/// Context for the classification instruction
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyContext {
    pub message: String,
    pub record: String,
    pub focus: String,
}

/// Context for the specification instruction
#[derive(Debug, Clone, Serialize)]
pub struct SpecifyContext {
    pub record: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
    /// User override directory (`.designcoach/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (`prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader rooted at the working directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let user_dir = root.join(".designcoach/prompts");
        let repo_dir = root.join("prompts");

        Self {
            hbs: new_handlebars(),
            user_dir: user_dir.exists().then_some(user_dir),
            repo_dir: repo_dir.exists().then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded templates
    pub fn embedded_only() -> Self {
        Self {
            hbs: new_handlebars(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Load a template by name, override first
    fn load_template(&self, name: &str) -> Result<String> {
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "load_template: using override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "load_template: using embedded template");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        let template = self.load_template(name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", name, e))
    }
}

/// Handlebars configured for plain-text prompts (no HTML escaping)
fn new_handlebars() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(handlebars::no_escape);
    hbs
}
