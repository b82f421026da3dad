//! Purpose: Library crate behind the `logexplain` CLI and its tests.
//! Exports: `core` (value decoding, shell rendering, line extraction, errors) plus
//! re-exports of the per-line entry points.
//! Role: Pure transformation of one log line into an explain query; no I/O.
//! Invariants: Core modules take explicit inputs (scan mode, layout) and hold no global mutable state.
pub mod core;

pub use crate::core::command::{Command, Fragment, Operation, SEPARATOR};
pub use crate::core::dispatch::{LineFormat, classify, explain_line, extract_command};
pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::scan::ScanMode;
pub use crate::core::skip::SkipReason;
