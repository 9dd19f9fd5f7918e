use super::*;

/// A left-nested `1 + 1 + ... + 1` chain, `depth` operators deep.
fn binary_chain(depth: usize) -> String {
    let mut doc = r#"{"type":"int","value":"1"}"#.to_owned();
    for _ in 0..depth {
        doc = format!(r#"{{"type":"binary","left":{doc},"right":{{"type":"int","value":"1"}}}}"#);
    }
    doc
}

#[test]
fn nesting_depth_counts_brackets() {
    assert_eq!(nesting_depth(b"1"), 0);
    assert_eq!(nesting_depth(b"[]"), 1);
    assert_eq!(nesting_depth(br#"{"a":[{"b":[]}],"c":{}}"#), 4);
}

#[test]
fn nesting_depth_ignores_brackets_in_strings() {
    assert_eq!(nesting_depth(br#"{"value":"[[[{{{"}"#), 1);
    assert_eq!(nesting_depth(br#"["\"[[", "\\", []]"#), 2);
}

#[test]
fn decodes_beyond_serde_json_default_limit() {
    let doc = binary_chain(300);
    assert!(serde_json::from_str::<Value>(&doc).is_err());

    let value = decode_tree(doc.as_bytes()).unwrap();
    assert_eq!(value["type"], "binary");
    assert_eq!(value["right"]["value"], "1");
}

#[test]
fn decodes_at_the_limit() {
    // Each operator adds one object level on top of the innermost literal.
    let doc = binary_chain(MAX_TREE_DEPTH - 1);
    assert_eq!(nesting_depth(doc.as_bytes()), MAX_TREE_DEPTH);
    assert!(decode_tree(doc.as_bytes()).is_ok());
}

#[test]
fn rejects_beyond_the_limit() {
    let doc = binary_chain(MAX_TREE_DEPTH);
    let err = decode_tree(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, DecodeError::TooDeep { depth } if depth == MAX_TREE_DEPTH + 1));
}

#[test]
fn rejects_malformed_and_trailing_input() {
    assert!(matches!(decode_tree(b"{not json"), Err(DecodeError::Json(_))));
    assert!(matches!(decode_tree(b"{} {}"), Err(DecodeError::Json(_))));
    assert!(decode_tree(b"  {\"type\":\"int\"}\n").is_ok());
}
