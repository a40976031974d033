//! Marker parser - explicit save-this annotations in assistant replies
//!
//! The chat instruction tells the model to confirm settled values on their
//! own line as `✅ kategori: värde`. Parsing them locally saves a second
//! network round-trip. The label table is closed and must stay in sync with
//! the category list in the chat instruction template.

use tracing::debug;

use crate::record::{Category, ExtractedEntry, Quality};

/// Confirmation glyph that opens a marker line
const MARKER_GLYPH: char = '✅';

/// Extract all marker entries from an assistant reply
///
/// Each matching line yields one entry with quality fixed to `concrete`;
/// the model only emits a marker for values it considers settled. Lines
/// with unrecognized labels are silently ignored.
pub fn parse_markers(reply: &str) -> Vec<ExtractedEntry> {
    reply
        .lines()
        .filter_map(split_marker_line)
        .filter_map(|(label, value)| match lookup_label(label) {
            Some(category) => Some(ExtractedEntry::new(category, value, Quality::Concrete)),
            None => {
                debug!(%label, "parse_markers: unrecognized label, skipping");
                None
            }
        })
        .collect()
}

/// Remove marker lines from a reply before it is shown to the user
///
/// Any line with the marker shape is stripped, recognized label or not.
pub fn strip_markers(reply: &str) -> String {
    reply
        .lines()
        .filter(|line| split_marker_line(line).is_none())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Split a line into (label, value) if it has the marker shape
fn split_marker_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix(MARKER_GLYPH)?;
    let (label, value) = rest.split_once(':')?;
    let label = label.trim();
    let value = value.trim();
    if label.is_empty() || value.is_empty() {
        return None;
    }
    Some((label, value))
}

/// Closed synonym table mapping localized labels to categories
///
/// The canonical camelCase keys are accepted too, so a model that echoes
/// the wire vocabulary still parses.
fn lookup_label(label: &str) -> Option<Category> {
    match label.to_lowercase().as_str() {
        "målgrupp" | "målgruppen" | "targetaudience" => Some(Category::TargetAudience),
        "utmaning" | "utmaningar" | "nuvarande utmaning" | "challenges" => Some(Category::Challenges),
        "framgång" | "framgångskriterium" | "framgångskriterier" | "success" => Some(Category::Success),
        "lärandemål" | "learninggoals" => Some(Category::LearningGoals),
        "motivation" | "drivkrafter" => Some(Category::Motivation),
        "beteende" | "beteenden" | "önskade beteenden" | "behaviors" => Some(Category::Behaviors),
        "scenario" | "scenarion" | "scenarier" | "scenarios" => Some(Category::Scenarios),
        _ => None,
    }
}
