//! Purpose: Name the reasons a log line produces no query.
//! Exports: `SkipReason`.
//! Role: Per-line failure taxonomy; callers skip the line and keep going.
//! Invariants: A skip never aborts the stream and never writes to stdout.
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SkipReason {
    /// Neither a structured record nor a legacy line with a command marker.
    Unclassifiable,
    /// A required field is absent or has the wrong shape.
    MissingField(&'static str),
    /// A `{`/`[` whose matching close was never found.
    UnbalancedDelimiter,
    /// A structured command that is neither `find` nor `aggregate`.
    UnsupportedCommand,
}

impl SkipReason {
    /// Stable short label, used as a counter key in run summaries.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Unclassifiable => "unclassifiable",
            SkipReason::MissingField(_) => "missing_field",
            SkipReason::UnbalancedDelimiter => "unbalanced_delimiter",
            SkipReason::UnsupportedCommand => "unsupported_command",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unclassifiable => write!(f, "no structured record or command marker"),
            SkipReason::MissingField(field) => write!(f, "missing or malformed field `{field}`"),
            SkipReason::UnbalancedDelimiter => write!(f, "unbalanced command object"),
            SkipReason::UnsupportedCommand => write!(f, "command is neither find nor aggregate"),
        }
    }
}
