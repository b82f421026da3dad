//! Purpose: Render decoded extended-JSON values as interactive-shell literals.
//! Exports: `to_shell`.
//! Role: Pure, recursive formatter used by the structured-log path.
//! Invariants: Object keys are emitted in lexicographic order.
//! Invariants: Numbers are echoed verbatim; strings are quoted but never escaped.
//! Invariants: Single-key `$oid`/`$date`/`$numberInt`/`$numberLong`/`$regularExpression`
//! objects become constructor syntax; any extra key makes them ordinary objects.
use std::borrow::Cow;

use crate::core::value::{Object, Value};

const INDENT: &str = "  ";

/// Render `value` as shell-literal text.
///
/// `depth` is the nesting level of `value` itself. In pretty mode its members
/// are indented `depth + 1` levels and its closing delimiter `depth` levels;
/// compact mode ignores `depth` and stays on one line.
pub fn to_shell(value: &Value, pretty: bool, depth: usize) -> String {
    let mut out = String::new();
    write_value(value, pretty, depth, &mut out);
    out
}

fn write_value(value: &Value, pretty: bool, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(val) => out.push_str(if *val { "true" } else { "false" }),
        Value::Number(text) => out.push_str(text),
        Value::String(text) => push_quoted(text, out),
        Value::Array(items) => write_array(items, pretty, depth, out),
        Value::Object(map) => {
            if let Some(shell) = wrapper_literal(map) {
                out.push_str(&shell);
            } else {
                write_object(map, pretty, depth, out);
            }
        }
    }
}

fn write_array(items: &[Value], pretty: bool, depth: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if pretty {
            if idx > 0 {
                out.push(',');
            }
            out.push('\n');
            push_indent(depth + 1, out);
        } else if idx > 0 {
            out.push_str(", ");
        }
        write_value(item, pretty, depth + 1, out);
    }
    if pretty {
        out.push('\n');
        push_indent(depth, out);
    }
    out.push(']');
}

fn write_object(map: &Object, pretty: bool, depth: usize, out: &mut String) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        if pretty {
            out.push('\n');
            push_indent(depth + 1, out);
        } else {
            out.push(' ');
        }
        push_quoted(key, out);
        out.push_str(": ");
        write_value(value, pretty, depth + 1, out);
    }
    if pretty {
        out.push('\n');
        push_indent(depth, out);
    } else {
        out.push(' ');
    }
    out.push('}');
}

/// Constructor syntax for a single-key extended-JSON wrapper, if `map` is one.
fn wrapper_literal(map: &Object) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;
    match key.as_str() {
        "$oid" => scalar_text(inner).map(|v| format!("ObjectId(\"{v}\")")),
        "$date" => scalar_text(inner).map(|v| format!("ISODate(\"{v}\")")),
        "$numberInt" | "$numberLong" => scalar_text(inner).map(Cow::into_owned),
        "$regularExpression" => {
            let re = inner.as_object()?;
            let pattern = re.get("pattern").and_then(scalar_text)?;
            let options = re.get("options").and_then(scalar_text).unwrap_or_default();
            Some(format!("/{pattern}/{options}"))
        }
        _ => None,
    }
}

// Wrapper payloads are spliced in as bare text; containers never are.
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) | Value::Number(text) => Some(Cow::Borrowed(text)),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn push_quoted(text: &str, out: &mut String) {
    out.push('"');
    out.push_str(text);
    out.push('"');
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::to_shell;
    use crate::core::value::{Value, decode_first};

    fn decode(text: &str) -> Value {
        decode_first(text).expect("valid json")
    }

    #[test]
    fn object_id_wrapper_becomes_constructor() {
        let value = decode(r#"{"$oid":"abc123"}"#);
        assert_eq!(to_shell(&value, false, 0), r#"ObjectId("abc123")"#);
        assert_eq!(to_shell(&value, true, 0), r#"ObjectId("abc123")"#);
    }

    #[test]
    fn wrapper_key_with_siblings_is_ordinary_object() {
        let value = decode(r#"{"$oid":"abc123","extra":1}"#);
        assert_eq!(
            to_shell(&value, false, 0),
            r#"{ "$oid": "abc123", "extra": 1 }"#
        );
    }

    #[test]
    fn date_number_and_regex_wrappers() {
        let value = decode(
            r#"{"d":{"$date":"2024-01-02T03:04:05Z"},"i":{"$numberInt":"7"},
                "l":{"$numberLong":"9007199254740993"},
                "r":{"$regularExpression":{"pattern":"^ab+c","options":"i"}}}"#,
        );
        assert_eq!(
            to_shell(&value, false, 0),
            r#"{ "d": ISODate("2024-01-02T03:04:05Z"), "i": 7, "l": 9007199254740993, "r": /^ab+c/i }"#
        );
    }

    #[test]
    fn regex_wrapper_without_object_payload_is_ordinary() {
        let value = decode(r#"{"$regularExpression":"abc"}"#);
        assert_eq!(
            to_shell(&value, false, 0),
            r#"{ "$regularExpression": "abc" }"#
        );
    }

    #[test]
    fn keys_are_sorted_lexicographically() {
        let value = decode(r#"{"b":1,"a":2,"B":3,"$and":4}"#);
        assert_eq!(
            to_shell(&value, false, 0),
            r#"{ "$and": 4, "B": 3, "a": 2, "b": 1 }"#
        );
    }

    #[test]
    fn pretty_nested_layout() {
        let value = decode(r#"{"a":{"b":[1,{"c":null}]},"s":"x"}"#);
        let expected = "{\n  \"a\": {\n    \"b\": [\n      1,\n      {\n        \"c\": null\n      }\n    ]\n  },\n  \"s\": \"x\"\n}";
        assert_eq!(to_shell(&value, true, 0), expected);
    }

    #[test]
    fn pretty_pipeline_layout() {
        let value = decode(r#"[{"$match":{"a":1}},{"$limit":5}]"#);
        let expected = "[\n  {\n    \"$match\": {\n      \"a\": 1\n    }\n  },\n  {\n    \"$limit\": 5\n  }\n]";
        assert_eq!(to_shell(&value, true, 0), expected);
    }

    #[test]
    fn compact_arrays_join_with_comma_space() {
        let value = decode(r#"[1,"two",true,null,[]]"#);
        assert_eq!(to_shell(&value, false, 0), r#"[1, "two", true, null, []]"#);
    }

    #[test]
    fn scalars_round_trip_their_text() {
        for text in ["0", "-12", "3.140", "1e-7", "true", "null", r#""plain""#] {
            assert_eq!(to_shell(&decode(text), true, 3), text);
        }
    }

    #[test]
    fn strings_are_not_escaped() {
        let value = Value::String("say \"hi\"".to_string());
        assert_eq!(to_shell(&value, false, 0), "\"say \"hi\"\"");
    }

    #[test]
    fn empty_containers_stay_on_one_line() {
        assert_eq!(to_shell(&decode("{}"), true, 0), "{}");
        assert_eq!(to_shell(&decode("[]"), true, 1), "[]");
        assert_eq!(to_shell(&decode(r#"{"a":{}}"#), false, 0), r#"{ "a": {} }"#);
    }
}
