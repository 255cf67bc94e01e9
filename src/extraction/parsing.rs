//! Turning raw completion text into JSON blocks.
//!
//! Models wrap their answer in all sorts of packaging: reasoning traces,
//! `<blocks>` tags, markdown code fences, trailing prose. The parser strips
//! the packaging and reads the first JSON value that holds records.

use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

static THINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").expect("THINK_RE: hardcoded regex is valid")
});

static BLOCKS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<blocks>(.*?)</blocks>").expect("BLOCKS_RE: hardcoded regex is valid")
});

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)```").expect("FENCE_RE: hardcoded regex is valid")
});

/// Parse one chunk's completion into extracted blocks.
///
/// Every object in the result carries an `error` flag: `false` for parsed
/// items (unless the model already set one), `true` on the single fallback
/// block produced when nothing parseable was found.
#[must_use]
pub fn parse_blocks(raw: &str, chunk_index: usize) -> Vec<Value> {
    match record_payload(&strip_packaging(raw)) {
        Some(value) => normalize(value)
            .into_iter()
            .map(|mut item| {
                if let Value::Object(map) = &mut item {
                    map.entry("error").or_insert(Value::Bool(false));
                }
                item
            })
            .collect(),
        None => {
            tracing::warn!(chunk = chunk_index, "Completion contained no parseable JSON");
            vec![json!({
                "index": chunk_index,
                "error": true,
                "tags": ["error"],
                "content": raw,
            })]
        }
    }
}

fn strip_packaging(raw: &str) -> String {
    let mut text = THINK_RE.replace_all(raw, "").into_owned();

    // An unterminated reasoning trace still ends at the closing tag if any
    if let Some(pos) = text.find("</think>") {
        text = text[pos + "</think>".len()..].to_string();
    }

    if let Some(caps) = BLOCKS_RE.captures(&text) {
        text = caps[1].to_string();
    }

    if let Some(caps) = FENCE_RE.captures(&text) {
        text = caps[1].to_string();
    }

    text.trim().to_string()
}

/// Find the record payload in `text`.
///
/// Candidates are tried in order of their opening bracket. The first object,
/// or array holding at least one object, wins. Without one, an empty array
/// means the model found nothing. Scalars and arrays of scalars (citation
/// markers such as `[1]`) never count.
fn record_payload(text: &str) -> Option<Value> {
    let mut empty_array = None;

    for (start, _) in text.char_indices().filter(|(_, c)| *c == '[' || *c == '{') {
        let Some(value) = serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
        else {
            continue;
        };

        let holds_records = match &value {
            Value::Object(_) => true,
            Value::Array(items) => items.iter().any(Value::is_object),
            _ => false,
        };
        if holds_records {
            return Some(value);
        }
        if empty_array.is_none() && value.as_array().is_some_and(Vec::is_empty) {
            empty_array = Some(value);
        }
    }

    empty_array
}

fn normalize(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => unwrap_single_array(map),
        other => vec![other],
    }
}

/// `{"venues": [...]}` becomes the inner array; any other object is one item.
fn unwrap_single_array(map: Map<String, Value>) -> Vec<Value> {
    if map.len() == 1 && map.values().all(Value::is_array) {
        return map
            .into_iter()
            .flat_map(|(_, v)| match v {
                Value::Array(items) => items,
                other => vec![other],
            })
            .collect();
    }
    vec![Value::Object(map)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_array_is_tagged() {
        let blocks = parse_blocks(r#"[{"name":"A"},{"name":"B"}]"#, 0);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["error"], json!(false));
    }

    #[test]
    fn reasoning_and_fences_are_stripped() {
        let raw = "<think>the user wants [brackets] and {braces}</think>\n\
                   Here you go:\n```json\n[{\"name\":\"A\"}]\n```\nDone.";
        let blocks = parse_blocks(raw, 0);
        assert_eq!(blocks, vec![json!({"name": "A", "error": false})]);
    }

    #[test]
    fn blocks_tags_are_unwrapped() {
        let raw = "<blocks>[{\"name\":\"A\"}]</blocks>";
        assert_eq!(parse_blocks(raw, 0).len(), 1);
    }

    #[test]
    fn single_object_is_wrapped() {
        let blocks = parse_blocks(r#"{"name":"A","title":"T"}"#, 0);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["name"], json!("A"));
    }

    #[test]
    fn object_with_single_array_field_is_unwrapped() {
        let blocks = parse_blocks(r#"{"venues":[{"name":"A"},{"name":"B"}]}"#, 0);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn existing_error_flag_is_kept() {
        let blocks = parse_blocks(r#"[{"name":"A","error":true}]"#, 0);
        assert_eq!(blocks[0]["error"], json!(true));
    }

    #[test]
    fn garbage_yields_error_block() {
        let blocks = parse_blocks("I could not find anything.", 3);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["error"], json!(true));
        assert_eq!(blocks[0]["index"], json!(3));
    }

    #[test]
    fn empty_array_yields_no_blocks() {
        assert!(parse_blocks("[]", 0).is_empty());
        assert!(parse_blocks("Nothing matched, so: []", 0).is_empty());
    }

    #[test]
    fn citation_marker_before_records_is_skipped() {
        let raw = r#"I found 2 venues [1]: [{"name":"A","title":"T"},{"name":"B","title":"T"}]"#;
        let blocks = parse_blocks(raw, 0);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["name"], json!("A"));
        assert_eq!(blocks[1]["error"], json!(false));
    }

    #[test]
    fn prose_with_numbers_then_single_object() {
        let raw = "Page [2] of [5]. Result: {\"name\":\"A\"} (see [3])";
        let blocks = parse_blocks(raw, 0);
        assert_eq!(blocks, vec![json!({"name": "A", "error": false})]);
    }

    #[test]
    fn scalars_only_yield_error_block() {
        let blocks = parse_blocks("Sources: [1] [2, 3] and \"quoted\"", 4);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["error"], json!(true));
        assert_eq!(blocks[0]["index"], json!(4));
    }
}
