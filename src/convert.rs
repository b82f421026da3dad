//! Purpose: Stream log lines through the explain pipeline and write query records.
//! Exports: `ConvertConfig`, `ConvertOutcome`, `convert`.
//! Role: I/O driver used by the CLI; isolates reading, writing and counting from `main`.
//! Invariants: Each non-blank input line yields either zero or exactly two output lines.
//! Invariants: Per-line skips are logged and counted, never returned as errors.
//! Invariants: Only read/write failures abort a run.
use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};

use bstr::ByteSlice;
use logexplain::core::dispatch::{classify, extract_command};
use logexplain::{Error, SEPARATOR, ScanMode};
use serde::Serialize;
use tracing::{debug, trace};

#[derive(Copy, Clone, Debug, Default)]
pub struct ConvertConfig {
    pub scan: ScanMode,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConvertOutcome {
    pub lines: u64,
    pub emitted: u64,
    pub skipped: u64,
    pub structured: u64,
    pub legacy: u64,
    pub skip_reasons: BTreeMap<&'static str, u64>,
    /// Set when the output closed early (e.g. `| head`); remaining input is not read.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub output_closed: bool,
}

impl ConvertOutcome {
    pub fn merge(&mut self, other: &ConvertOutcome) {
        self.lines += other.lines;
        self.emitted += other.emitted;
        self.skipped += other.skipped;
        self.structured += other.structured;
        self.legacy += other.legacy;
        for (reason, count) in &other.skip_reasons {
            *self.skip_reasons.entry(*reason).or_default() += count;
        }
        self.output_closed |= other.output_closed;
    }
}

pub fn convert<R, W>(reader: R, writer: &mut W, config: ConvertConfig) -> Result<ConvertOutcome, Error>
where
    R: Read,
    W: Write,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut outcome = ConvertOutcome::default();
    let mut line_no = 0u64;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|err| Error::from_io(err, "failed to read input").with_line(line_no + 1))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let raw = buf.trim_end_with(|ch| ch == '\n' || ch == '\r');
        if raw.trim().is_empty() {
            continue;
        }
        outcome.lines += 1;

        let text = raw.to_str_lossy();
        let format = classify(&text);
        if format.is_structured() {
            outcome.structured += 1;
        } else {
            outcome.legacy += 1;
        }

        let query = match extract_command(&format, config.scan) {
            Ok(command) => command.explain_query(),
            Err(reason) => {
                debug!(line = line_no, reason = %reason, "skipped line");
                outcome.skipped += 1;
                *outcome.skip_reasons.entry(reason.label()).or_default() += 1;
                continue;
            }
        };

        trace!(line = line_no, "emitting query");
        match write_record(writer, &query) {
            Ok(()) => outcome.emitted += 1,
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                debug!(line = line_no, "output closed; stopping");
                outcome.output_closed = true;
                break;
            }
            Err(err) => {
                return Err(Error::from_io(err, "failed to write output").with_line(line_no));
            }
        }
    }
    Ok(outcome)
}

fn write_record<W: Write>(writer: &mut W, query: &str) -> io::Result<()> {
    writer.write_all(query.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.write_all(SEPARATOR.as_bytes())?;
    writer.write_all(b"\n")?;
    // Records must reach a `tail -f` consumer before the next line is read.
    writer.flush()
}
