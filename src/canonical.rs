//! Canonical JSON serialization for signing payloads.
//!
//! Both request-signing schemes (the asymmetric custody authorization
//! signature and the symmetric aggregator HMAC) sign a byte-stable JSON
//! rendering of their payload: object keys sorted lexicographically, no
//! insignificant whitespace. Key order is enforced here explicitly rather
//! than relying on map iteration order.

use serde::Serialize;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

/// Serialize a value to its canonical JSON string.
///
/// The returned string is byte-identical for logically equal inputs,
/// independent of construction order.
pub fn to_canonical_string<T: Serialize>(value: &T) -> PipelineResult<String> {
    let value = serde_json::to_value(value)
        .map_err(|e| PipelineError::Validation(format!("payload not serializable: {e}")))?;
    let mut out = String::new();
    write_canonical(&value, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) -> PipelineResult<()> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&escape_string(key)?);
                out.push(':');
                write_canonical(&map[*key], out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        leaf => out.push_str(
            &serde_json::to_string(leaf)
                .map_err(|e| PipelineError::Validation(format!("payload not serializable: {e}")))?,
        ),
    }
    Ok(())
}

fn escape_string(value: &str) -> PipelineResult<String> {
    serde_json::to_string(value)
        .map_err(|e| PipelineError::Validation(format!("payload not serializable: {e}")))
}
