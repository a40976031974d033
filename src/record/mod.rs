//! The learning-design record and its category vocabulary
//!
//! Seven fixed categories describe a learning design. One of them
//! (`targetAudience`) holds a single string; the other six hold ordered
//! sequences. The record starts empty, is mutated incrementally by the
//! merger after every chat turn, and is only cleared by a session reset.

mod merge;

pub use merge::{MergeMode, Merger, QualityFilter};

use serde::{Deserialize, Serialize};

/// The closed set of record fields
///
/// Canonical wire keys are camelCase; the classifier's JSON contract, the
/// marker label table, and the record serialization all use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    TargetAudience,
    Challenges,
    Success,
    LearningGoals,
    Motivation,
    Behaviors,
    Scenarios,
}

impl Category {
    /// All categories, in dashboard order
    pub const ALL: [Category; 7] = [
        Category::TargetAudience,
        Category::Challenges,
        Category::Success,
        Category::LearningGoals,
        Category::Motivation,
        Category::Behaviors,
        Category::Scenarios,
    ];

    /// Canonical wire key
    pub fn key(&self) -> &'static str {
        match self {
            Category::TargetAudience => "targetAudience",
            Category::Challenges => "challenges",
            Category::Success => "success",
            Category::LearningGoals => "learningGoals",
            Category::Motivation => "motivation",
            Category::Behaviors => "behaviors",
            Category::Scenarios => "scenarios",
        }
    }

    /// Parse a canonical wire key
    ///
    /// The vocabulary is closed: anything else is rejected, never invented.
    pub fn from_key(key: &str) -> Option<Category> {
        match key {
            "targetAudience" => Some(Category::TargetAudience),
            "challenges" => Some(Category::Challenges),
            "success" => Some(Category::Success),
            "learningGoals" => Some(Category::LearningGoals),
            "motivation" => Some(Category::Motivation),
            "behaviors" => Some(Category::Behaviors),
            "scenarios" => Some(Category::Scenarios),
            _ => None,
        }
    }

    /// Swedish dashboard heading
    pub fn label(&self) -> &'static str {
        match self {
            Category::TargetAudience => "Målgrupp",
            Category::Challenges => "Nuvarande utmaning",
            Category::Success => "Framgångskriterier",
            Category::LearningGoals => "Lärandemål",
            Category::Motivation => "Motivation",
            Category::Behaviors => "Önskade beteenden",
            Category::Scenarios => "Konkreta scenarion",
        }
    }

    /// Swedish phrase used when this category is the conversation focus
    pub fn focus_name(&self) -> &'static str {
        match self {
            Category::TargetAudience => "målgruppen",
            Category::Challenges => "nuvarande utmaningar",
            Category::Success => "framgångskriterier",
            Category::LearningGoals => "lärandemål",
            Category::Motivation => "motivation",
            Category::Behaviors => "önskade beteenden",
            Category::Scenarios => "konkreta scenarion",
        }
    }

    /// Whether this category holds a single string rather than a sequence
    pub fn is_single(&self) -> bool {
        matches!(self, Category::TargetAudience)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Classifier confidence that an extracted value is usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Usable as-is
    Concrete,
    /// Usable with reasonable inferred elaboration
    Vague,
    /// Not usable
    Incomplete,
}

/// One extracted piece of design data, ready for merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntry {
    pub category: Category,
    pub value: String,
    pub quality: Quality,
}

impl ExtractedEntry {
    pub fn new(category: Category, value: impl Into<String>, quality: Quality) -> Self {
        Self {
            category,
            value: value.into(),
            quality,
        }
    }
}

/// The running learning-design record
///
/// Keys are exactly the seven categories; the struct shape enforces the
/// invariant that no other keys can exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignRecord {
    pub target_audience: String,
    pub challenges: Vec<String>,
    pub success: Vec<String>,
    pub learning_goals: Vec<String>,
    pub motivation: Vec<String>,
    pub behaviors: Vec<String>,
    pub scenarios: Vec<String>,
}

impl DesignRecord {
    /// Fixed category total
    pub const TOTAL: usize = Category::ALL.len();

    /// The sequence behind a sequence category; None for `targetAudience`
    pub fn seq(&self, category: Category) -> Option<&Vec<String>> {
        match category {
            Category::TargetAudience => None,
            Category::Challenges => Some(&self.challenges),
            Category::Success => Some(&self.success),
            Category::LearningGoals => Some(&self.learning_goals),
            Category::Motivation => Some(&self.motivation),
            Category::Behaviors => Some(&self.behaviors),
            Category::Scenarios => Some(&self.scenarios),
        }
    }

    pub(crate) fn seq_mut(&mut self, category: Category) -> Option<&mut Vec<String>> {
        match category {
            Category::TargetAudience => None,
            Category::Challenges => Some(&mut self.challenges),
            Category::Success => Some(&mut self.success),
            Category::LearningGoals => Some(&mut self.learning_goals),
            Category::Motivation => Some(&mut self.motivation),
            Category::Behaviors => Some(&mut self.behaviors),
            Category::Scenarios => Some(&mut self.scenarios),
        }
    }

    /// Whether a category counts as filled
    ///
    /// A non-empty string, or a sequence with at least one element.
    pub fn is_filled(&self, category: Category) -> bool {
        match self.seq(category) {
            None => !self.target_audience.trim().is_empty(),
            Some(seq) => !seq.is_empty(),
        }
    }

    /// Number of filled categories, always within 0..=7
    pub fn filled_count(&self) -> usize {
        Category::ALL.iter().filter(|c| self.is_filled(**c)).count()
    }

    /// All seven categories filled
    pub fn is_complete(&self) -> bool {
        self.filled_count() == Self::TOTAL
    }

    /// Joined display value for a filled category, None otherwise
    pub fn display_value(&self, category: Category) -> Option<String> {
        if !self.is_filled(category) {
            return None;
        }
        Some(match self.seq(category) {
            None => self.target_audience.clone(),
            Some(seq) => seq.join("; "),
        })
    }

    /// One `key: value` line per filled category, for prompt context
    pub fn summary_lines(&self) -> Vec<String> {
        Category::ALL
            .iter()
            .filter_map(|c| self.display_value(*c).map(|v| format!("{}: {}", c.key(), v)))
            .collect()
    }

    /// Clear the record back to its initial empty state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
