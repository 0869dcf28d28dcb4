use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// A column on the download allow-list holds a value that cannot be turned
    /// into a file. This points at a misconfigured allow-list and aborts the
    /// whole render.
    #[error("column `{column}` is downloadable but holds an unsupported {kind} value")]
    UnsupportedDownload { column: String, kind: &'static str },

    #[error("record must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl TableError {
    pub fn unsupported_download(column: impl Into<String>, value: &Value) -> Self {
        Self::UnsupportedDownload {
            column: column.into(),
            kind: value_kind(value),
        }
    }
}

/// Short name of a JSON value's type, for error messages and logs.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
