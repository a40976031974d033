//! Extraction of structured entries from chat turns
//!
//! Two paths produce [`ExtractedEntry`](crate::record::ExtractedEntry)
//! values: the marker parser reads explicit confirmations out of the
//! assistant's reply (no network), and the classifier asks the LLM to
//! categorize the user's turn. Markers take priority; the classifier only
//! runs when a reply carries none.

mod classifier;
mod markers;

pub use classifier::{Analysis, Classifier};
pub use markers::{parse_markers, strip_markers};
