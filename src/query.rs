// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Read-side filters.
//!
//! Both predicates are optional. Only the ones actually supplied reach the
//! backend; with none supplied the lookup lists every record.

use serde_json::{Map, Value};

use crate::protocol::record::PayloadRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub owner_key: Option<String>,
    pub content_key: Option<String>,
}

impl RecordFilter {
    /// Build a filter from raw request parameters. Empty strings are absent.
    pub fn from_params(owner_key: Option<String>, content_key: Option<String>) -> Self {
        Self {
            owner_key: owner_key.filter(|s| !s.is_empty()),
            content_key: content_key.filter(|s| !s.is_empty()),
        }
    }

    pub fn by_content(content_key: &str) -> Self {
        Self::from_params(None, Some(content_key.to_string()))
    }

    /// True when no predicate was supplied.
    pub fn is_unscoped(&self) -> bool {
        self.owner_key.is_none() && self.content_key.is_none()
    }

    pub fn matches(&self, record: &PayloadRecord) -> bool {
        self.owner_key.as_deref().map_or(true, |k| record.owner_key == k)
            && self.content_key.as_deref().map_or(true, |k| record.content_key == k)
    }

    /// The filter document sent to vault nodes.
    pub fn to_backend_filter(&self) -> Value {
        let mut filter = Map::new();
        if let Some(k) = &self.owner_key {
            filter.insert("owner_key".into(), Value::String(k.clone()));
        }
        if let Some(k) = &self.content_key {
            filter.insert("content_key".into(), Value::String(k.clone()));
        }
        Value::Object(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(owner: &str, content: &str) -> PayloadRecord {
        PayloadRecord {
            id: "r".into(),
            owner_key: owner.into(),
            content_key: content.into(),
            chunk_index: 0,
            total_chunks: 1,
            payload_fragment: "{}".into(),
        }
    }

    #[test]
    fn empty_params_are_dropped() {
        let f = RecordFilter::from_params(Some(String::new()), Some("QmVid".into()));
        assert_eq!(f.owner_key, None);
        assert_eq!(f.to_backend_filter(), json!({"content_key": "QmVid"}));
    }

    #[test]
    fn unscoped_filter_matches_everything() {
        let f = RecordFilter::from_params(None, None);
        assert!(f.is_unscoped());
        assert_eq!(f.to_backend_filter(), json!({}));
        assert!(f.matches(&record("a", "b")));
    }

    #[test]
    fn both_predicates_must_hold() {
        let f = RecordFilter::from_params(Some("0x1".into()), Some("v1".into()));
        assert!(f.matches(&record("0x1", "v1")));
        assert!(!f.matches(&record("0x1", "v2")));
        assert!(!f.matches(&record("0x2", "v1")));
    }
}
