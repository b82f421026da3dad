//! Purpose: Extract find/aggregate commands from pre-JSON text log lines.
//! Exports: `extract`, `string_field`, `number_field`, `object_field`.
//! Role: Legacy path of the format dispatcher; pattern matching plus delimiter scanning.
//! Invariants: Object/array fields are returned verbatim; nothing is re-serialized.
//! Invariants: Collection (`find`/`aggregate` key) and `$db` are mandatory.
//! Notes: Scalar patterns are unanchored; the first occurrence in the command text wins.
use std::sync::LazyLock;

use regex::Regex;

use crate::core::command::{Command, Fragment, Operation};
use crate::core::scan::{ScanMode, matching_close};
use crate::core::skip::SkipReason;

const AGGREGATE_MARKER: &str = " command: aggregate ";
const FIND_MARKER: &str = " command: find ";

struct FieldPatterns {
    find: Regex,
    aggregate: Regex,
    db: Regex,
    limit: Regex,
    skip: Regex,
}

static PATTERNS: LazyLock<FieldPatterns> = LazyLock::new(|| FieldPatterns {
    find: string_pattern("find"),
    aggregate: string_pattern("aggregate"),
    db: string_pattern("$db"),
    limit: number_pattern("limit"),
    skip: number_pattern("skip"),
});

fn string_pattern(key: &str) -> Regex {
    Regex::new(&format!(r#"{}: "([^"]+)""#, regex::escape(key))).expect("valid field pattern")
}

fn number_pattern(key: &str) -> Regex {
    Regex::new(&format!(r"{}: ([0-9]+)", regex::escape(key))).expect("valid field pattern")
}

/// Build a command from a legacy log line.
pub fn extract(line: &str, mode: ScanMode) -> Result<Command, SkipReason> {
    let (operation, marker_at) = if let Some(at) = line.find(AGGREGATE_MARKER) {
        (Operation::Aggregate, at + AGGREGATE_MARKER.len())
    } else if let Some(at) = line.find(FIND_MARKER) {
        (Operation::Find, at + FIND_MARKER.len())
    } else {
        return Err(SkipReason::Unclassifiable);
    };

    let open = line[marker_at..]
        .find('{')
        .map(|offset| marker_at + offset)
        .ok_or(SkipReason::MissingField("command"))?;
    let close = matching_close(line, open, mode).ok_or(SkipReason::UnbalancedDelimiter)?;
    let command = &line[open..=close];

    let patterns = &*PATTERNS;
    let name_pattern = match operation {
        Operation::Find => &patterns.find,
        Operation::Aggregate => &patterns.aggregate,
    };
    let collection =
        string_field(command, name_pattern).ok_or(SkipReason::MissingField(operation.key()))?;
    let database = string_field(command, &patterns.db).ok_or(SkipReason::MissingField("$db"))?;

    let raw = |text: &str| Fragment::Raw(text.to_string());

    match operation {
        Operation::Find => {
            let body = object_field(command, "filter", mode)
                .map(raw)
                .unwrap_or_else(Fragment::empty_filter_raw);
            let mut cmd = Command::new(database, collection, operation, body);
            cmd.projection = object_field(command, "projection", mode).map(raw);
            cmd.sort = object_field(command, "sort", mode).map(raw);
            cmd.skip = number_field(command, &patterns.skip).map(raw);
            cmd.limit = number_field(command, &patterns.limit).map(raw);
            Ok(cmd)
        }
        Operation::Aggregate => {
            let body = object_field(command, "pipeline", mode)
                .map(raw)
                .ok_or(SkipReason::MissingField("pipeline"))?;
            Ok(Command::new(database, collection, operation, body))
        }
    }
}

/// Value of the first `key: "value"` match.
pub fn string_field<'a>(text: &'a str, pattern: &Regex) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Digits of the first `key: <digits>` match.
pub fn number_field<'a>(text: &'a str, pattern: &Regex) -> Option<&'a str> {
    string_field(text, pattern)
}

/// Verbatim `{...}` or `[...]` following the first `key:` in `text`.
pub fn object_field<'a>(text: &'a str, key: &str, mode: ScanMode) -> Option<&'a str> {
    let key_at = text.find(&format!("{key}:"))?;
    let open = key_at + text[key_at..].find(['{', '['])?;
    let close = matching_close(text, open, mode)?;
    Some(&text[open..=close])
}
