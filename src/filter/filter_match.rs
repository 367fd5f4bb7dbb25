use serde_json::Value;

use super::types::DocFilter;
use crate::database::Document;

impl DocFilter {
    /// Evaluate the filter against a document held in memory.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            DocFilter::All => true,
            DocFilter::Eq { field, value } => doc.get(field) == Some(value),
            DocFilter::Contains { needle, .. } if needle.is_empty() => true,
            DocFilter::Contains { field, needle } => match doc.get(field) {
                Some(Value::String(s)) => s.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            DocFilter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            DocFilter::And(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}
