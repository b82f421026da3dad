//! Purpose: Describe one extracted find/aggregate command and assemble its explain query.
//! Exports: `Operation`, `Fragment`, `Command`, `SEPARATOR`.
//! Role: Query assembler shared by the structured and legacy extraction paths.
//! Invariants: Modifiers are chained in fixed order sort -> skip -> limit, only when present.
//! Invariants: Decoded bodies are pretty-printed on their own lines; raw bodies are inlined verbatim.
use crate::core::shell::to_shell;
use crate::core::value::{Object, Value};

/// Line written after every assembled query.
pub const SEPARATOR: &str = "---";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    Find,
    Aggregate,
}

impl Operation {
    /// Command key naming the operation; its value is the collection name.
    pub fn key(self) -> &'static str {
        match self {
            Operation::Find => "find",
            Operation::Aggregate => "aggregate",
        }
    }
}

/// A command argument: either a decoded value or text lifted verbatim from a legacy line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Value(Value),
    Raw(String),
}

impl Fragment {
    pub fn empty_filter_value() -> Self {
        Fragment::Value(Value::Object(Object::new()))
    }

    pub fn empty_filter_raw() -> Self {
        Fragment::Raw("{}".to_string())
    }

    fn compact(&self) -> String {
        match self {
            Fragment::Value(value) => to_shell(value, false, 0),
            Fragment::Raw(text) => text.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub database: String,
    pub collection: String,
    pub operation: Operation,
    /// Filter for `find`, pipeline for `aggregate`.
    pub body: Fragment,
    pub projection: Option<Fragment>,
    pub sort: Option<Fragment>,
    pub skip: Option<Fragment>,
    pub limit: Option<Fragment>,
}

impl Command {
    pub fn new(
        database: impl Into<String>,
        collection: impl Into<String>,
        operation: Operation,
        body: Fragment,
    ) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            operation,
            body,
            projection: None,
            sort: None,
            skip: None,
            limit: None,
        }
    }

    /// Assemble the shell command, ending in `.explain()`.
    pub fn explain_query(&self) -> String {
        let mut query = format!(
            "db.getSiblingDB('{}').{}.{}(",
            self.database,
            self.collection,
            self.operation.key()
        );
        let projection = match self.operation {
            Operation::Find => self.projection.as_ref(),
            Operation::Aggregate => None,
        };
        push_arguments(&self.body, projection, &mut query);
        query.push(')');

        if self.operation == Operation::Find {
            let chain = [
                ("sort", &self.sort),
                ("skip", &self.skip),
                ("limit", &self.limit),
            ];
            for (method, fragment) in chain {
                if let Some(fragment) = fragment {
                    query.push('.');
                    query.push_str(method);
                    query.push('(');
                    query.push_str(&fragment.compact());
                    query.push(')');
                }
            }
        }

        query.push_str(".explain()");
        query
    }
}

fn push_arguments(body: &Fragment, extra: Option<&Fragment>, out: &mut String) {
    match body {
        Fragment::Value(value) => {
            out.push('\n');
            out.push_str(&to_shell(value, true, 0));
            if let Some(extra) = extra {
                out.push_str(",\n");
                out.push_str(&pretty(extra));
            }
            out.push('\n');
        }
        Fragment::Raw(text) => {
            out.push_str(text);
            if let Some(extra) = extra {
                out.push_str(", ");
                out.push_str(&extra.compact());
            }
        }
    }
}

fn pretty(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Value(value) => to_shell(value, true, 0),
        Fragment::Raw(text) => text.clone(),
    }
}
