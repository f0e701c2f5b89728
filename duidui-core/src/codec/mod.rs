//! Boundary obfuscation codec.
//!
//! Strings crossing the network edge are base64-encoded twice. This is
//! opacity only: anyone can reverse it, and nothing in the core relies on it
//! for confidentiality. Stored CDK codes use the same encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;

use crate::Error;

/// Applies standard base64 twice.
pub fn encode(plain: &str) -> String {
    let first = BASE64.encode(plain.as_bytes());
    BASE64.encode(first.as_bytes())
}

/// Inverts [`encode`]. Fails if either layer is not valid base64 or the
/// innermost bytes are not UTF-8.
pub fn decode(encoded: &str) -> Result<String, Error> {
    let first = BASE64.decode(encoded.as_bytes())?;
    let second = BASE64.decode(&first)?;
    Ok(String::from_utf8(second)?)
}

/// Encodes every string leaf of a JSON value. Object keys, numbers, bools
/// and nulls pass through.
pub fn encode_strings(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(encode(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(encode_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, encode_strings(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Inverse of [`encode_strings`]; the first undecodable leaf fails the call.
pub fn decode_strings(value: Value) -> Result<Value, Error> {
    Ok(match value {
        Value::String(s) => Value::String(decode(&s)?),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(decode_strings)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| decode_strings(v).map(|v| (k, v)))
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}
