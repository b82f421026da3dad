//! Purpose: Extract find/aggregate commands from structured JSON log records.
//! Exports: `extract`.
//! Role: JSON path of the format dispatcher; reads `attr.ns` and `attr.command`.
//! Invariants: `ns` splits on its first `.` only; the collection keeps any further dots.
//! Invariants: Aggregate records without a `pipeline` are skipped, never defaulted.
use crate::core::command::{Command, Fragment, Operation};
use crate::core::skip::SkipReason;
use crate::core::value::{Object, Value};

/// Build a command from a decoded record that carries an `attr` key.
pub fn extract(record: &Object) -> Result<Command, SkipReason> {
    let attr = record
        .get("attr")
        .and_then(Value::as_object)
        .ok_or(SkipReason::MissingField("attr"))?;
    let command = attr
        .get("command")
        .and_then(Value::as_object)
        .ok_or(SkipReason::MissingField("attr.command"))?;
    let (database, collection) = attr
        .get("ns")
        .and_then(Value::as_str)
        .and_then(|ns| ns.split_once('.'))
        .ok_or(SkipReason::MissingField("attr.ns"))?;

    let operation = if command.contains_key("find") {
        Operation::Find
    } else if command.contains_key("aggregate") {
        Operation::Aggregate
    } else {
        return Err(SkipReason::UnsupportedCommand);
    };

    let field = |key: &str| command.get(key).cloned().map(Fragment::Value);

    match operation {
        Operation::Find => {
            let body = field("filter").unwrap_or_else(Fragment::empty_filter_value);
            let mut cmd = Command::new(database, collection, operation, body);
            cmd.projection = field("projection");
            cmd.sort = field("sort");
            cmd.skip = field("skip");
            cmd.limit = field("limit");
            Ok(cmd)
        }
        Operation::Aggregate => {
            let body = field("pipeline").ok_or(SkipReason::MissingField("pipeline"))?;
            Ok(Command::new(database, collection, operation, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::extract;
    use crate::core::command::{Fragment, Operation};
    use crate::core::skip::SkipReason;
    use crate::core::value::{Object, decode_first};

    fn record(text: &str) -> Object {
        decode_first(text)
            .expect("valid json")
            .as_object()
            .cloned()
            .expect("object")
    }

    #[test]
    fn namespace_splits_on_first_dot_only() {
        let cmd = extract(&record(
            r#"{"attr":{"ns":"app.system.profile","command":{"find":"system.profile"}}}"#,
        ))
        .expect("command");
        assert_eq!(cmd.database, "app");
        assert_eq!(cmd.collection, "system.profile");
        assert_eq!(cmd.body, Fragment::empty_filter_value());
    }

    #[test]
    fn find_reads_all_modifiers() {
        let cmd = extract(&record(
            r#"{"attr":{"ns":"d.c","command":{"find":"c","filter":{"a":1},
                "projection":{"a":1},"sort":{"a":-1},"skip":2,"limit":3}}}"#,
        ))
        .expect("command");
        assert_eq!(cmd.operation, Operation::Find);
        assert!(cmd.projection.is_some());
        assert!(cmd.sort.is_some());
        assert!(cmd.skip.is_some());
        assert!(cmd.limit.is_some());
    }

    #[test]
    fn find_takes_precedence_over_aggregate() {
        let cmd = extract(&record(
            r#"{"attr":{"ns":"d.c","command":{"aggregate":"c","find":"c","pipeline":[]}}}"#,
        ))
        .expect("command");
        assert_eq!(cmd.operation, Operation::Find);
    }

    #[test]
    fn aggregate_requires_pipeline() {
        let err = extract(&record(
            r#"{"attr":{"ns":"d.c","command":{"aggregate":"c","cursor":{}}}}"#,
        ))
        .unwrap_err();
        assert_eq!(err, SkipReason::MissingField("pipeline"));
    }

    #[test]
    fn other_commands_are_unsupported() {
        let err = extract(&record(
            r#"{"attr":{"ns":"d.c","command":{"insert":"c","documents":[]}}}"#,
        ))
        .unwrap_err();
        assert_eq!(err, SkipReason::UnsupportedCommand);
    }

    #[test]
    fn malformed_attr_fields_are_skipped() {
        let cases = [
            (r#"{"attr":"text"}"#, "attr"),
            (r#"{"attr":{"ns":"d.c"}}"#, "attr.command"),
            (r#"{"attr":{"ns":"d.c","command":[1]}}"#, "attr.command"),
            (r#"{"attr":{"command":{"find":"c"}}}"#, "attr.ns"),
            (r#"{"attr":{"ns":"nodot","command":{"find":"c"}}}"#, "attr.ns"),
            (r#"{"attr":{"ns":7,"command":{"find":"c"}}}"#, "attr.ns"),
        ];
        for (text, field) in cases {
            assert_eq!(
                extract(&record(text)).unwrap_err(),
                SkipReason::MissingField(field),
                "input: {text}"
            );
        }
    }
}
