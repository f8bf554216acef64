// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Splits serialized payloads into bounded-size fragments.
//!
//! Sizes are counted in characters, and cuts always land on a character
//! boundary, so every fragment is valid UTF-8 on its own and the fragments
//! concatenate back to the exact input.

use serde::Serialize;

/// Split `text` into fragments of at most `max_fragment_size` characters.
///
/// Every fragment except the last holds exactly `max_fragment_size`
/// characters. Empty text yields a single empty fragment so that an empty
/// payload still forms a group with `total_chunks = 1`.
///
/// # Panics
///
/// Panics if `max_fragment_size` is zero. Config validation rejects zero.
pub fn chunk(text: &str, max_fragment_size: usize) -> Vec<&str> {
    assert!(max_fragment_size > 0, "max_fragment_size must be > 0");

    if text.is_empty() {
        return vec![""];
    }

    let mut fragments = Vec::with_capacity(text.len() / max_fragment_size + 1);
    let mut start = 0;
    let mut chars_in_fragment = 0;
    for (offset, _) in text.char_indices() {
        if chars_in_fragment == max_fragment_size {
            fragments.push(&text[start..offset]);
            start = offset;
            chars_in_fragment = 0;
        }
        chars_in_fragment += 1;
    }
    fragments.push(&text[start..]);
    fragments
}

/// Summary of how a payload would be split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkPlan {
    pub total_chars: usize,
    pub max_fragment_size: usize,
    pub fragment_lengths: Vec<usize>,
}

impl ChunkPlan {
    pub fn for_text(text: &str, max_fragment_size: usize) -> Self {
        let fragment_lengths = chunk(text, max_fragment_size)
            .iter()
            .map(|f| f.chars().count())
            .collect();
        Self {
            total_chars: text.chars().count(),
            max_fragment_size,
            fragment_lengths,
        }
    }

    pub fn total_chunks(&self) -> usize {
        self.fragment_lengths.len()
    }

    /// Number of backend write calls needed at `max_batch_size` records each.
    pub fn batches(&self, max_batch_size: usize) -> usize {
        self.total_chunks().div_ceil(max_batch_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_thousand_chars_at_3500() {
        let text = "x".repeat(9000);
        let lens: Vec<usize> = chunk(&text, 3500).iter().map(|f| f.len()).collect();
        assert_eq!(lens, vec![3500, 3500, 2000]);
    }

    #[test]
    fn short_text_is_one_fragment() {
        assert_eq!(chunk("{\"a\":1}", 3500), vec!["{\"a\":1}"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_fragment() {
        let fragments = chunk("abcdef", 3);
        assert_eq!(fragments, vec!["abc", "def"]);
    }

    #[test]
    fn empty_text_is_one_empty_fragment() {
        assert_eq!(chunk("", 10), vec![""]);
    }

    #[test]
    fn multibyte_characters_are_never_split() {
        let text = "ééé✓✓深";
        let fragments = chunk(text, 2);
        assert_eq!(fragments, vec!["éé", "é✓", "✓深"]);
        assert_eq!(fragments.concat(), text);
    }

    #[test]
    fn plan_counts_batches() {
        let plan = ChunkPlan::for_text(&"y".repeat(101), 10);
        assert_eq!(plan.total_chunks(), 11);
        assert_eq!(plan.batches(5), 3);
        assert_eq!(plan.fragment_lengths.last(), Some(&1));
    }
}
