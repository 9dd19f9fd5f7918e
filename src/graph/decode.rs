//! Depth-bounded decoding of syntax tree documents.
//!
//! DESIGN
//! ======
//! serde_json refuses documents nested more than 128 levels, and ordinary
//! programs exceed that: a chain of binary operators nests one object per
//! operator. Trees are decoded with that limit disabled, on a stack that
//! grows on demand (`serde_stacker`).
//!
//! Conversion to [`AstValue`](super::AstValue) and graph building still recurse
//! once per level, so a document is first measured by an iterative scan and
//! rejected above [`MAX_TREE_DEPTH`].

use serde::Deserialize;
use serde_json::Value;

/// Deepest bracket nesting accepted for graph rendering.
pub const MAX_TREE_DEPTH: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("tree nests {depth} levels deep (limit {MAX_TREE_DEPTH})")]
    TooDeep { depth: usize },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deepest `[`/`{` nesting in `bytes`, ignoring brackets inside strings.
///
/// Does not validate; malformed input yields an approximate answer.
#[must_use]
pub fn nesting_depth(bytes: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &b in bytes {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Decode a JSON syntax tree of at most [`MAX_TREE_DEPTH`] levels.
///
/// # Errors
///
/// Returns [`DecodeError::TooDeep`] above the depth limit and
/// [`DecodeError::Json`] for malformed input.
pub fn decode_tree(bytes: &[u8]) -> Result<Value, DecodeError> {
    let depth = nesting_depth(bytes);
    if depth > MAX_TREE_DEPTH {
        return Err(DecodeError::TooDeep { depth });
    }

    let mut json = serde_json::Deserializer::from_slice(bytes);
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
