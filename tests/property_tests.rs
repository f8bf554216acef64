use proptest::prelude::*;
use serde_json::{json, Value};

use craft_relay::codec;
use craft_relay::error::RelayError;
use craft_relay::protocol::chunker::chunk;
use craft_relay::protocol::reassembly::{assemble_text, reassemble, Reassembled};
use craft_relay::protocol::record::{tag_fragments, PayloadRecord};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>().prop_filter("finite", |f| f.is_finite()).prop_map(|f| json!(f)),
        "\\PC{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn records_for(payload: &Value, size: usize) -> Vec<PayloadRecord> {
    let text = codec::serialize(payload).unwrap();
    tag_fragments("0xowner", "QmProp", &chunk(&text, size))
}

proptest! {
    #[test]
    fn prop_round_trip_in_any_order(
        (payload, records) in (arb_json(), 1usize..40).prop_flat_map(|(payload, size)| {
            let records = records_for(&payload, size);
            (Just(payload), Just(records).prop_shuffle())
        })
    ) {
        match reassemble(records).unwrap() {
            Reassembled::Single(group) => prop_assert_eq!(group.payload, payload),
            other => prop_assert!(false, "expected one group, got {:?}", other),
        }
    }

    #[test]
    fn prop_chunk_count_and_sizes(text in "\\PC{0,300}", size in 1usize..64) {
        let fragments = chunk(&text, size);
        let chars = text.chars().count();
        let expected = if chars == 0 { 1 } else { chars.div_ceil(size) };

        prop_assert_eq!(fragments.len(), expected);
        prop_assert_eq!(fragments.concat(), text.clone());
        for f in &fragments[..fragments.len() - 1] {
            prop_assert_eq!(f.chars().count(), size);
        }
        prop_assert!(fragments.last().unwrap().chars().count() <= size);
    }

    #[test]
    fn prop_missing_fragment_is_never_silently_reassembled(
        text in "\\PC{2,200}",
        size in 1usize..16,
        drop in any::<prop::sample::Index>(),
    ) {
        let mut records = tag_fragments("0xowner", "QmDrop", &chunk(&text, size));
        prop_assume!(records.len() >= 2);
        records.remove(drop.index(records.len()));

        let is_incomplete = matches!(
            assemble_text("QmDrop", records),
            Err(RelayError::ReassemblyIncomplete { .. })
        );
        prop_assert!(is_incomplete);
    }
}
