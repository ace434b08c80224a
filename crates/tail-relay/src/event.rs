// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One invocation observed by the host runtime, as delivered to a tail consumer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEvent {
    /// Name of the script that produced the logs. Usually a string, `null`
    /// for events not tied to a script; forwarded as `app` whatever it is.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub script_name: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<LogItem>>,
    /// Everything else the host attaches to the event (outcome, timestamps,
    /// exceptions...). Kept so the raw batch can be logged as received.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl TraceEvent {
    /// Log items of this event, empty when the host omitted them.
    pub fn logs(&self) -> &[LogItem] {
        self.logs.as_deref().unwrap_or_default()
    }

    /// The script name when it is a string.
    pub fn script_name(&self) -> Option<&str> {
        self.script_name.as_str()
    }
}

/// One element of an event's `logs` array.
///
/// Anything that is not a JSON object is kept as `Malformed` so a single bad
/// element only costs its own delivery, not the whole batch.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LogItem {
    Entry(LogEntry),
    Malformed(Value),
}

/// A structured log record. Only `message` is interpreted; every other field
/// belongs to the host runtime and is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LogEntry(pub Map<String, Value>);

impl LogEntry {
    pub fn message(&self) -> Option<&Value> {
        self.0.get("message")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for LogEntry {
    fn from(fields: Map<String, Value>) -> Self {
        LogEntry(fields)
    }
}

/// Total number of log items across a batch, malformed ones included.
pub fn count_log_entries(events: &[TraceEvent]) -> usize {
    events.iter().map(|event| event.logs().len()).sum()
}
