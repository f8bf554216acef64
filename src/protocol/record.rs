// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Self-describing storage records.
//!
//! Every fragment carries its group key, its position and the group size.
//! No separate manifest is written; `total_chunks` replicated on each record
//! is the manifest.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored fragment of a serialized payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_key: String,
    pub content_key: String,
    pub chunk_index: u32,
    pub total_chunks: u32,
    pub payload_fragment: String,
}

/// Acknowledgement of one batch by one backend node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub node: String,
    pub batch_index: usize,
    pub created: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Tag `fragments` with fresh UUID v4 identifiers.
pub fn tag_fragments(owner_key: &str, content_key: &str, fragments: &[&str]) -> Vec<PayloadRecord> {
    tag_fragments_with(owner_key, content_key, fragments, || Uuid::new_v4().to_string())
}

/// Tag `fragments`, drawing identifiers from `next_id`.
pub fn tag_fragments_with<F>(
    owner_key: &str,
    content_key: &str,
    fragments: &[&str],
    mut next_id: F,
) -> Vec<PayloadRecord>
where
    F: FnMut() -> String,
{
    let total_chunks = fragments.len() as u32;
    fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| PayloadRecord {
            id: next_id(),
            owner_key: owner_key.to_string(),
            content_key: content_key.to_string(),
            chunk_index: i as u32,
            total_chunks,
            payload_fragment: (*fragment).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_and_totals() {
        let mut n = 0;
        let records = tag_fragments_with("0xabc", "QmVid", &["ab", "cd", "e"], || {
            n += 1;
            format!("id-{n}")
        });
        assert_eq!(records.len(), 3);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.chunk_index, i as u32);
            assert_eq!(r.total_chunks, 3);
            assert_eq!(r.owner_key, "0xabc");
            assert_eq!(r.content_key, "QmVid");
        }
        assert_eq!(records[2].id, "id-3");
        assert_eq!(records[2].payload_fragment, "e");
    }

    #[test]
    fn generated_ids_are_unique() {
        let records = tag_fragments("o", "c", &["a", "b", "c", "d"]);
        let mut ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn id_serializes_as_underscore_id() {
        let r = &tag_fragments_with("o", "c", &["x"], || "fixed".into())[0];
        let v = serde_json::to_value(r).unwrap();
        assert_eq!(v["_id"], "fixed");
        assert!(v.get("id").is_none());
    }
}
