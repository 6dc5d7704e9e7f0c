use std::borrow::Cow;

use crate::model::task::Task;
use crate::parse::{FIELD_NAMES, ROW_TERMINATOR};

/// Serialize a full store: header row, then one row per task.
pub fn serialize_records(tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str(&FIELD_NAMES.join(","));
    out.push_str(ROW_TERMINATOR);
    for task in tasks {
        out.push_str(&serialize_record(task));
        out.push_str(ROW_TERMINATOR);
    }
    out
}

/// Serialize one task as a row, without the terminator.
pub fn serialize_record(task: &Task) -> String {
    [
        escape_field(&task.id),
        escape_field(&task.title),
        Cow::Borrowed(task.state.code()),
        escape_field(&task.note),
    ]
    .join(",")
}

/// Quote a field only when it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
