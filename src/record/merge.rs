//! Record merger - applies extracted entries to the design record
//!
//! Both the sequence policy and the quality threshold are explicit,
//! configured choices rather than hardcoded behavior.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DesignRecord, ExtractedEntry, Quality};

/// How new values land in sequence categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMode {
    /// Always add as a new element
    #[default]
    Append,
    /// Replace the final element (an enriched rewrite of the most recent
    /// entry); append when the sequence is empty
    ReplaceLast,
}

/// Which quality tiers are eligible for merging
///
/// `incomplete` entries are always discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityFilter {
    /// Only values usable as-is
    #[default]
    ConcreteOnly,
    /// The generous variant: vague values are merged too
    ConcreteAndVague,
}

impl QualityFilter {
    /// Whether an entry of the given quality may be merged
    pub fn accepts(&self, quality: Quality) -> bool {
        match self {
            QualityFilter::ConcreteOnly => quality == Quality::Concrete,
            QualityFilter::ConcreteAndVague => matches!(quality, Quality::Concrete | Quality::Vague),
        }
    }
}

/// Applies extracted entries to a design record under a fixed policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Merger {
    mode: MergeMode,
    filter: QualityFilter,
}

impl Merger {
    pub fn new(mode: MergeMode, filter: QualityFilter) -> Self {
        Self { mode, filter }
    }

    /// Merge one entry into the record
    ///
    /// Returns true when the record was updated. Single-string categories
    /// always replace outright; sequence categories follow the merge mode.
    /// Entries below the quality threshold, or with empty values, leave the
    /// record untouched.
    pub fn apply(&self, record: &mut DesignRecord, entry: &ExtractedEntry) -> bool {
        if !self.filter.accepts(entry.quality) {
            debug!(category = %entry.category, quality = ?entry.quality, "apply: below quality threshold");
            return false;
        }

        let value = entry.value.trim();
        if value.is_empty() {
            return false;
        }

        match record.seq_mut(entry.category) {
            None => {
                record.target_audience = value.to_string();
            }
            Some(seq) => match self.mode {
                MergeMode::Append => seq.push(value.to_string()),
                MergeMode::ReplaceLast => {
                    if let Some(last) = seq.last_mut() {
                        *last = value.to_string();
                    } else {
                        seq.push(value.to_string());
                    }
                }
            },
        }

        debug!(category = %entry.category, "apply: merged");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    fn entry(category: Category, value: &str, quality: Quality) -> ExtractedEntry {
        ExtractedEntry::new(category, value, quality)
    }

    #[test]
    fn test_append_preserves_submission_order() {
        let merger = Merger::new(MergeMode::Append, QualityFilter::ConcreteOnly);
        let mut record = DesignRecord::default();

        for value in ["första", "andra", "tredje"] {
            assert!(merger.apply(&mut record, &entry(Category::Challenges, value, Quality::Concrete)));
        }

        assert_eq!(record.challenges, vec!["första", "andra", "tredje"]);
    }

    #[test]
    fn test_replace_last_on_empty_appends_first() {
        let merger = Merger::new(MergeMode::ReplaceLast, QualityFilter::ConcreteOnly);
        let mut record = DesignRecord::default();

        assert!(merger.apply(&mut record, &entry(Category::Scenarios, "kundsamtal", Quality::Concrete)));
        assert_eq!(record.scenarios, vec!["kundsamtal"]);
    }

    #[test]
    fn test_replace_last_never_grows_nonempty_sequence() {
        let merger = Merger::new(MergeMode::ReplaceLast, QualityFilter::ConcreteOnly);
        let mut record = DesignRecord {
            scenarios: vec!["gammalt".to_string(), "senaste".to_string()],
            ..Default::default()
        };

        assert!(merger.apply(
            &mut record,
            &entry(Category::Scenarios, "berikad omskrivning", Quality::Concrete)
        ));

        assert_eq!(record.scenarios, vec!["gammalt", "berikad omskrivning"]);
        assert_eq!(record.scenarios.len(), 2);
    }

    #[test]
    fn test_single_category_replaces_outright_in_both_modes() {
        for mode in [MergeMode::Append, MergeMode::ReplaceLast] {
            let merger = Merger::new(mode, QualityFilter::ConcreteOnly);
            let mut record = DesignRecord {
                target_audience: "gammal målgrupp".to_string(),
                ..Default::default()
            };

            assert!(merger.apply(
                &mut record,
                &entry(Category::TargetAudience, "Säljare på B2B-företag", Quality::Concrete)
            ));
            assert_eq!(record.target_audience, "Säljare på B2B-företag");
        }
    }

    #[test]
    fn test_incomplete_is_always_discarded() {
        for filter in [QualityFilter::ConcreteOnly, QualityFilter::ConcreteAndVague] {
            let merger = Merger::new(MergeMode::Append, filter);
            let mut record = DesignRecord::default();

            assert!(!merger.apply(&mut record, &entry(Category::Motivation, "otydligt", Quality::Incomplete)));
            assert!(record.motivation.is_empty());
        }
    }

    #[test]
    fn test_vague_gated_by_filter() {
        let strict = Merger::new(MergeMode::Append, QualityFilter::ConcreteOnly);
        let generous = Merger::new(MergeMode::Append, QualityFilter::ConcreteAndVague);
        let vague = entry(Category::LearningGoals, "bli bättre på systemet", Quality::Vague);

        let mut record = DesignRecord::default();
        assert!(!strict.apply(&mut record, &vague));
        assert!(record.learning_goals.is_empty());

        assert!(generous.apply(&mut record, &vague));
        assert_eq!(record.learning_goals.len(), 1);
    }

    #[test]
    fn test_empty_value_is_discarded() {
        let merger = Merger::default();
        let mut record = DesignRecord::default();

        assert!(!merger.apply(&mut record, &entry(Category::Challenges, "   ", Quality::Concrete)));
        assert!(record.challenges.is_empty());
    }

    #[test]
    fn test_value_is_trimmed() {
        let merger = Merger::default();
        let mut record = DesignRecord::default();

        assert!(merger.apply(&mut record, &entry(Category::TargetAudience, "  Säljare  ", Quality::Concrete)));
        assert_eq!(record.target_audience, "Säljare");
    }

    #[test]
    fn test_merge_mode_serde_kebab() {
        let mode: MergeMode = serde_yaml::from_str("replace-last").unwrap();
        assert_eq!(mode, MergeMode::ReplaceLast);

        let filter: QualityFilter = serde_yaml::from_str("concrete-and-vague").unwrap();
        assert_eq!(filter, QualityFilter::ConcreteAndVague);
    }
}
