// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Turns a host log entry into the record shipped to the collector.
//!
//! The record is the entry's own fields plus `app`, the name of the script
//! that emitted it. A `message` made of several fragments is flattened into a
//! single string so the collector can index it as one line.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::event::LogEntry;

/// Separator placed between the fragments of a multi-part message.
pub const MESSAGE_SEPARATOR: &str = " ; ";

/// A log entry ready to be forwarded. Serializes as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnrichedLogRecord(Map<String, Value>);

impl EnrichedLogRecord {
    pub fn app(&self) -> Option<&str> {
        self.0.get("app").and_then(Value::as_str)
    }

    pub fn message(&self) -> Option<&Value> {
        self.0.get("message")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.0)
    }
}

/// Builds the record for `entry`, emitted by the script named `script_name`.
///
/// `app` always replaces any `app` field the entry already carried. It is the
/// script name as the host sent it, so a script without a name yields
/// `"app": null`.
pub fn enrich(script_name: &Value, entry: &LogEntry) -> EnrichedLogRecord {
    let mut fields = entry.fields().clone();

    fields.insert("app".to_string(), script_name.clone());

    if let Some(Value::Array(fragments)) = fields.get("message") {
        let joined = join_fragments(fragments);
        fields.insert("message".to_string(), Value::String(joined));
    }

    EnrichedLogRecord(fields)
}

/// Joins message fragments with [`MESSAGE_SEPARATOR`].
///
/// Strings are used as-is and `null` becomes an empty fragment. Any other
/// value is rendered as compact JSON.
pub fn join_fragments(fragments: &[Value]) -> String {
    fragments
        .iter()
        .map(|fragment| match fragment {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<String>>()
        .join(MESSAGE_SEPARATOR)
}
