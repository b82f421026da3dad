//! Purpose: `logexplain` CLI entry point.
//! Role: Binary crate root; parses args, streams inputs through `convert`, writes queries to stdout.
//! Invariants: stdout carries only query records (query line + `---`).
//! Invariants: Diagnostics go to stderr: tracing logs, optional JSON summary, fatal errors.
//! Invariants: Fatal errors are text on a terminal and one JSON object otherwise.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod convert;

use convert::{ConvertConfig, ConvertOutcome, convert};
use logexplain::{Error, ErrorKind, ScanMode, to_exit_code};

#[derive(Parser)]
#[command(
    name = "logexplain",
    version,
    about = "Turn logged find/aggregate commands into shell explain() queries",
    long_about = None,
    after_help = r#"Reads server log lines (structured JSON records or legacy text lines) and
prints one `db.getSiblingDB(...)...explain()` command per find/aggregate, each
followed by a `---` line. Lines that are not find/aggregate commands are skipped.

EXAMPLES
  $ logexplain mongod.log
  $ tail -f mongod.log | logexplain
  $ logexplain --quote-aware --summary old.log new.log

Set RUST_LOG=debug to see why individual lines were skipped."#
)]
struct Cli {
    #[arg(
        value_name = "FILE",
        help = "Log files to read in order; `-` or no files reads stdin",
        value_hint = ValueHint::FilePath
    )]
    files: Vec<PathBuf>,

    #[arg(
        long,
        help = "Ignore braces and brackets inside quoted strings when scanning legacy lines"
    )]
    quote_aware: bool,

    #[arg(long, help = "Write a JSON run summary to stderr when done")]
    summary: bool,

    #[arg(long, value_name = "SHELL", help = "Print a shell completion script and exit")]
    completions: Option<Shell>,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(0);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `logexplain --help`."));
            }
        },
    };

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::aot::generate(shell, &mut cmd, "logexplain", &mut io::stdout());
        return Ok(0);
    }

    let config = ConvertConfig {
        scan: if cli.quote_aware {
            ScanMode::QuoteAware
        } else {
            ScanMode::Raw
        },
    };

    let outcome = convert_inputs(&cli.files, config).map_err(add_io_hint)?;
    info!(
        lines = outcome.lines,
        emitted = outcome.emitted,
        skipped = outcome.skipped,
        "done"
    );
    if cli.summary {
        eprintln!("{}", summary_line(&outcome)?);
    }
    Ok(0)
}

fn convert_inputs(files: &[PathBuf], config: ConvertConfig) -> Result<ConvertOutcome, Error> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let mut total = ConvertOutcome::default();

    let stdin_only = [PathBuf::from("-")];
    let inputs = if files.is_empty() { &stdin_only[..] } else { files };
    for path in inputs {
        let outcome = if is_stdin(path) {
            convert(io::stdin().lock(), &mut writer, config)?
        } else {
            let file = File::open(path).map_err(|err| {
                Error::from_io(err, "failed to open input").with_path(path)
            })?;
            convert(file, &mut writer, config).map_err(|err| err.with_path(path))?
        };
        info!(
            input = %path.display(),
            lines = outcome.lines,
            emitted = outcome.emitted,
            skipped = outcome.skipped,
            "input processed"
        );
        total.merge(&outcome);
        if total.output_closed {
            return Ok(total);
        }
    }

    match writer.flush() {
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
            Err(Error::from_io(err, "failed to write output"))
        }
        _ => Ok(total),
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::NotFound => err.with_hint("Check the log file path."),
        ErrorKind::Permission => err.with_hint("Permission denied. Check file permissions."),
        ErrorKind::Io => err.with_hint("I/O error. Check the input and output streams."),
        _ => err,
    }
}

fn summary_line(outcome: &ConvertOutcome) -> Result<String, Error> {
    serde_json::to_string(&json!({ "summary": outcome })).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode run summary")
            .with_source(err)
    })
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(line) = err.line() {
        inner.insert("line".to_string(), json!(line));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    if let Some(line) = err.line() {
        lines.push(format!("line: {line}"));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, error_json, error_text, summary_line};
    use crate::convert::ConvertOutcome;
    use clap::{CommandFactory, Parser};
    use logexplain::{Error, ErrorKind};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn files_and_flags_parse() {
        let cli = Cli::try_parse_from(["logexplain", "--quote-aware", "a.log", "-", "b.log"])
            .expect("parse");
        assert!(cli.quote_aware);
        assert!(!cli.summary);
        assert_eq!(cli.files.len(), 3);
    }

    #[test]
    fn error_json_includes_context() {
        let err = Error::from_io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
            "failed to open input",
        )
        .with_path("missing.log")
        .with_hint("Check the log file path.");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "NotFound");
        assert_eq!(value["error"]["message"], "failed to open input");
        assert_eq!(value["error"]["path"], "missing.log");
        assert_eq!(value["error"]["causes"][0], "No such file");
    }

    #[test]
    fn error_text_lists_hint_and_path() {
        let err = Error::new(ErrorKind::Usage)
            .with_hint("Try `logexplain --help`.")
            .with_path("a.log");
        assert_eq!(
            error_text(&err),
            "error: usage error\nhint: Try `logexplain --help`.\npath: a.log"
        );
    }

    #[test]
    fn internal_errors_report_their_kind() {
        let err = Error::new(ErrorKind::Internal).with_message("failed to encode run summary");
        assert_eq!(error_json(&err)["error"]["kind"], "Internal");
        assert_eq!(error_text(&Error::new(ErrorKind::Internal)), "error: internal error");
    }

    #[test]
    fn summary_line_wraps_counters() {
        let outcome = ConvertOutcome {
            lines: 2,
            emitted: 1,
            skipped: 1,
            ..ConvertOutcome::default()
        };
        let line = summary_line(&outcome).expect("summary");
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["summary"]["emitted"], 1);
        assert!(value["summary"].get("output_closed").is_none());
    }
}
