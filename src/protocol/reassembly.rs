// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Reassembly — rebuilds payloads from fetched fragments.
//!
//! Backends return records in no particular order. Records are grouped by
//! `content_key`, ordered by `chunk_index`, and checked against the
//! `total_chunks` and `owner_key` they all declare before anything is
//! concatenated. A group that fails the check is reported as incomplete,
//! never truncated.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::codec;
use crate::error::{GroupDefect, RelayError, Result};
use crate::protocol::record::PayloadRecord;

/// One fully reassembled content group.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentGroup {
    pub owner_key: String,
    pub content_key: String,
    pub payload: Value,
}

/// Outcome of reassembling a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Reassembled {
    /// No fragments matched.
    Empty,
    /// Exactly one content group matched.
    Single(ContentGroup),
    /// Several content groups matched, ordered by `content_key`.
    Many(Vec<ContentGroup>),
}

impl Reassembled {
    pub fn is_empty(&self) -> bool {
        matches!(self, Reassembled::Empty)
    }

    pub fn groups(&self) -> usize {
        match self {
            Reassembled::Empty => 0,
            Reassembled::Single(_) => 1,
            Reassembled::Many(groups) => groups.len(),
        }
    }
}

/// Reassemble every content group present in `records`.
///
/// Fails if any group is defective; a partially uploaded group is never
/// reported next to healthy ones.
pub fn reassemble(records: Vec<PayloadRecord>) -> Result<Reassembled> {
    if records.is_empty() {
        return Ok(Reassembled::Empty);
    }

    let mut by_group: BTreeMap<String, Vec<PayloadRecord>> = BTreeMap::new();
    for record in records {
        by_group.entry(record.content_key.clone()).or_default().push(record);
    }

    let mut groups = Vec::with_capacity(by_group.len());
    for (content_key, fragments) in by_group {
        let owner_key = fragments[0].owner_key.clone();
        let text = assemble_text(&content_key, fragments)?;
        let payload = codec::deserialize(&text)?;
        groups.push(ContentGroup { owner_key, content_key, payload });
    }

    if groups.len() == 1 {
        Ok(Reassembled::Single(groups.remove(0)))
    } else {
        Ok(Reassembled::Many(groups))
    }
}

/// Verify one content group and concatenate its fragments in index order.
pub fn assemble_text(content_key: &str, mut fragments: Vec<PayloadRecord>) -> Result<String> {
    let incomplete = |defect| RelayError::ReassemblyIncomplete {
        content_key: content_key.to_string(),
        defect,
    };

    let Some(first) = fragments.first() else {
        return Err(incomplete(GroupDefect::Missing { expected: 1, found: 0 }));
    };
    let total_chunks = first.total_chunks;
    let owner_key = first.owner_key.clone();

    fragments.sort_by_key(|r| r.chunk_index);

    let mut previous: Option<u32> = None;
    for r in &fragments {
        if r.owner_key != owner_key {
            return Err(incomplete(GroupDefect::OwnerMismatch {
                first: owner_key,
                other: r.owner_key.clone(),
            }));
        }
        if r.total_chunks != total_chunks {
            return Err(incomplete(GroupDefect::InconsistentTotal {
                first: total_chunks,
                other: r.total_chunks,
            }));
        }
        if r.chunk_index >= total_chunks {
            return Err(incomplete(GroupDefect::OutOfRange {
                chunk_index: r.chunk_index,
                total_chunks,
            }));
        }
        if previous == Some(r.chunk_index) {
            return Err(incomplete(GroupDefect::Duplicate { chunk_index: r.chunk_index }));
        }
        previous = Some(r.chunk_index);
    }

    // Sorted, in range and duplicate-free: the count alone proves completeness.
    if fragments.len() != total_chunks as usize {
        return Err(incomplete(GroupDefect::Missing {
            expected: total_chunks,
            found: fragments.len() as u32,
        }));
    }

    let capacity = fragments.iter().map(|r| r.payload_fragment.len()).sum();
    let mut text = String::with_capacity(capacity);
    for r in &fragments {
        text.push_str(&r.payload_fragment);
    }
    Ok(text)
}
