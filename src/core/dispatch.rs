//! Purpose: Classify a log line as structured JSON or legacy text and route it.
//! Exports: `LineFormat`, `classify`, `extract_command`, `explain_line`.
//! Role: Entry point of the per-line pipeline; pure and stateless.
//! Invariants: A line is structured iff its first JSON value is an object with an `attr` key.
//! Invariants: Every other line takes the legacy path; classification never fails.
use crate::core::command::Command;
use crate::core::legacy;
use crate::core::scan::ScanMode;
use crate::core::skip::SkipReason;
use crate::core::structured;
use crate::core::value::{Object, Value, decode_first};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineFormat<'a> {
    Structured(Object),
    Legacy(&'a str),
}

impl LineFormat<'_> {
    pub fn is_structured(&self) -> bool {
        matches!(self, LineFormat::Structured(_))
    }
}

pub fn classify(line: &str) -> LineFormat<'_> {
    match decode_first(line) {
        Ok(Value::Object(record)) if record.contains_key("attr") => {
            LineFormat::Structured(record)
        }
        _ => LineFormat::Legacy(line),
    }
}

/// Extract the command from an already classified line.
pub fn extract_command(format: &LineFormat<'_>, mode: ScanMode) -> Result<Command, SkipReason> {
    match format {
        LineFormat::Structured(record) => structured::extract(record),
        LineFormat::Legacy(line) => legacy::extract(line, mode),
    }
}

/// Classify, extract and assemble: the explain query for `line`, or why there is none.
pub fn explain_line(line: &str, mode: ScanMode) -> Result<String, SkipReason> {
    let format = classify(line);
    extract_command(&format, mode).map(|command| command.explain_query())
}
