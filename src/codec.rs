// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Canonical text form of payloads.
//!
//! Payloads are compact JSON. `serde_json::Map` keeps keys sorted, so the
//! same value always produces the same text regardless of the order the
//! client or the backend handed keys over.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serialize `payload` to its canonical text.
pub fn serialize<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}

/// Inverse of [`serialize`].
pub fn deserialize<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn key_order_is_canonical() {
        let a: Value = serde_json::from_str(r#"{"b":1,"a":{"d":2,"c":3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":{"c":3,"d":2},"b":1}"#).unwrap();
        assert_eq!(serialize(&a).unwrap(), serialize(&b).unwrap());
    }

    #[test]
    fn malformed_text_is_a_serialization_error() {
        let err = deserialize::<Value>("{\"frames\": [").unwrap_err();
        assert_eq!(err.code(), "serialization_error");
    }

    #[test]
    fn round_trip_preserves_unicode() {
        let v = json!({"note": "squat ✓ 深蹲", "reps": 12});
        let text = serialize(&v).unwrap();
        assert_eq!(deserialize::<Value>(&text).unwrap(), v);
    }

    #[test]
    fn landmark_coordinates_survive_exactly() {
        for x in [0.09611701729705895_f64, 0.053281809335611156, 0.10379568210585295] {
            let v = json!({"location": {"x": x, "y": -x, "z": x / 3.0}});
            let back: Value = deserialize(&serialize(&v).unwrap()).unwrap();
            assert_eq!(back, v);
            assert_eq!(back["location"]["x"].as_f64().map(f64::to_bits), Some(x.to_bits()));
        }
    }
}
