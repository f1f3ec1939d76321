use super::lenient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One concrete occurrence of an error.
///
/// List endpoints usually omit [`Event::data`]; the single-event endpoint
/// includes the full SDK payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Server-side id (UUID).
    pub id: String,

    /// SDK-assigned event id.
    #[serde(default)]
    pub event_id: String,

    /// Owning issue (UUID).
    #[serde(default)]
    pub issue: String,

    /// Owning project id.
    #[serde(default)]
    pub project: Option<i64>,

    /// When the error occurred, per the SDK (ISO 8601).
    #[serde(default)]
    pub timestamp: String,

    /// When the server received the event.
    #[serde(default)]
    pub ingested_at: String,

    /// When the server grouped the event into its issue.
    #[serde(default)]
    pub digested_at: String,

    /// Ordering key within the issue.
    #[serde(default)]
    pub digest_order: u64,

    /// Grouping the event was assigned to.
    #[serde(default)]
    pub grouping: Option<Value>,

    /// Full SDK payload.
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<EventPayload>,
}

/// The SDK payload of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Exception chain, innermost cause first.
    #[serde(
        default,
        deserialize_with = "deserialize_exceptions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exception: Vec<Exception>,

    /// Plain message, as a string or `{message, formatted}` object.
    #[serde(default)]
    pub message: Option<Value>,

    /// Structured log entry.
    #[serde(default)]
    pub logentry: Option<Value>,

    /// Severity level.
    #[serde(default)]
    pub level: Option<String>,

    /// SDK platform, e.g. `python`.
    #[serde(default)]
    pub platform: Option<String>,

    /// Release the event was reported from.
    #[serde(default)]
    pub release: Option<String>,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Option<String>,

    /// Host name.
    #[serde(default)]
    pub server_name: Option<String>,

    /// Tags, as an object or a list of pairs.
    #[serde(default)]
    pub tags: Option<Value>,

    /// Contexts (browser, os, runtime, ...).
    #[serde(default)]
    pub contexts: Option<Value>,

    /// HTTP request the error occurred in.
    #[serde(default, deserialize_with = "lenient")]
    pub request: Option<RequestInfo>,
}

impl EventPayload {
    /// Best-effort human-readable message.
    #[must_use]
    pub fn message_text(&self) -> Option<String> {
        [&self.logentry, &self.message]
            .into_iter()
            .flatten()
            .find_map(text_of)
    }

    /// `name version` of a named context such as `browser` or `os`.
    #[must_use]
    pub fn context_summary(&self, key: &str) -> Option<String> {
        let context = self.contexts.as_ref()?.get(key)?;
        let name = context.get("name").and_then(Value::as_str)?;
        match context.get("version").and_then(Value::as_str) {
            Some(version) if !version.is_empty() => Some(format!("{name} {version}")),
            _ => Some(name.to_string()),
        }
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => ["formatted", "message"]
            .into_iter()
            .filter_map(|k| map.get(k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// SDKs send either `{"values": [...]}` or a bare list.
fn deserialize_exceptions<'de, D>(deserializer: D) -> Result<Vec<Exception>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let values = match value {
        Some(Value::Object(mut map)) => map.remove("values").unwrap_or(Value::Null),
        Some(list @ Value::Array(_)) => list,
        _ => Value::Null,
    };
    Ok(serde_json::from_value(values).unwrap_or_default())
}

/// One exception in a chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exception {
    /// Exception type name.
    #[serde(rename = "type", default)]
    pub exception_type: Option<String>,

    /// Exception message.
    #[serde(default)]
    pub value: Option<String>,

    /// Module the exception type lives in.
    #[serde(default)]
    pub module: Option<String>,

    /// Stack at the point of raising.
    #[serde(default, deserialize_with = "lenient")]
    pub stacktrace: Option<Stacktrace>,
}

impl Exception {
    /// `Type: value` headline.
    #[must_use]
    pub fn headline(&self) -> String {
        match (self.exception_type.as_deref(), self.value.as_deref()) {
            (Some(ty), Some(value)) if !value.is_empty() => format!("{ty}: {value}"),
            (Some(ty), _) => ty.to_string(),
            (None, Some(value)) => value.to_string(),
            (None, None) => "(unknown exception)".to_string(),
        }
    }
}

/// A stack trace, oldest frame first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stacktrace {
    /// Frames in SDK order (outermost call first).
    #[serde(default)]
    pub frames: Vec<Frame>,
}

/// One stack frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Relative file name.
    #[serde(default)]
    pub filename: Option<String>,

    /// Absolute path.
    #[serde(default)]
    pub abs_path: Option<String>,

    /// Function name.
    #[serde(default)]
    pub function: Option<String>,

    /// Module name.
    #[serde(default)]
    pub module: Option<String>,

    /// Line number.
    #[serde(default)]
    pub lineno: Option<u32>,

    /// Column number.
    #[serde(default)]
    pub colno: Option<u32>,

    /// Source line at `lineno`.
    #[serde(default)]
    pub context_line: Option<String>,

    /// Whether the frame belongs to application code.
    #[serde(default)]
    pub in_app: Option<bool>,
}

impl Frame {
    /// File location, `file:line:col` with whatever parts are known.
    #[must_use]
    pub fn location(&self) -> String {
        let file = self
            .filename
            .as_deref()
            .or(self.abs_path.as_deref())
            .or(self.module.as_deref())
            .unwrap_or("<unknown>");
        match (self.lineno, self.colno) {
            (Some(line), Some(col)) => format!("{file}:{line}:{col}"),
            (Some(line), None) => format!("{file}:{line}"),
            _ => file.to_string(),
        }
    }
}

/// The HTTP request attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Request URL.
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP method.
    #[serde(default)]
    pub method: Option<String>,

    /// Query string, in whatever shape the SDK sent it.
    #[serde(default)]
    pub query_string: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_view_event_without_data() {
        let event: Event = serde_json::from_value(json!({
            "id": "0f7e7c9a-8c1d-4b0a-9d58-2f1f0a3b4c5d",
            "event_id": "a1b2c3",
            "issue": "5e1b7a62-3f0e-4a59-9c52-0a4f7c1d2e3f",
            "timestamp": "2024-05-01T10:00:00Z",
            "digest_order": 3
        }))
        .unwrap();
        assert!(event.data.is_none());
        assert_eq!(event.digest_order, 3);
    }

    #[test]
    fn test_exception_values_object() {
        let payload: EventPayload = serde_json::from_value(json!({
            "exception": {"values": [{
                "type": "KeyError",
                "value": "'user'",
                "stacktrace": {"frames": [{"filename": "app.py", "lineno": 10, "function": "main"}]}
            }]}
        }))
        .unwrap();
        assert_eq!(payload.exception.len(), 1);
        assert_eq!(payload.exception[0].headline(), "KeyError: 'user'");
        let frames = &payload.exception[0].stacktrace.as_ref().unwrap().frames;
        assert_eq!(frames[0].location(), "app.py:10");
    }

    #[test]
    fn test_exception_bare_list() {
        let payload: EventPayload =
            serde_json::from_value(json!({"exception": [{"type": "Boom"}]})).unwrap();
        assert_eq!(payload.exception[0].headline(), "Boom");
    }

    #[test]
    fn test_malformed_sections_are_absent() {
        let payload: EventPayload = serde_json::from_value(json!({
            "exception": "not an exception",
            "request": 42,
            "level": "error"
        }))
        .unwrap();
        assert!(payload.exception.is_empty());
        assert!(payload.request.is_none());
        assert_eq!(payload.level.as_deref(), Some("error"));
    }

    #[test]
    fn test_message_text_prefers_logentry_formatted() {
        let payload: EventPayload = serde_json::from_value(json!({
            "logentry": {"message": "User %s failed", "formatted": "User 7 failed"},
            "message": "ignored"
        }))
        .unwrap();
        assert_eq!(payload.message_text().as_deref(), Some("User 7 failed"));

        let plain: EventPayload = serde_json::from_value(json!({"message": "hello"})).unwrap();
        assert_eq!(plain.message_text().as_deref(), Some("hello"));

        assert_eq!(EventPayload::default().message_text(), None);
    }

    #[test]
    fn test_context_summary() {
        let payload: EventPayload = serde_json::from_value(json!({
            "contexts": {
                "browser": {"name": "Firefox", "version": "126.0"},
                "os": {"name": "Linux"}
            }
        }))
        .unwrap();
        assert_eq!(
            payload.context_summary("browser").as_deref(),
            Some("Firefox 126.0")
        );
        assert_eq!(payload.context_summary("os").as_deref(), Some("Linux"));
        assert_eq!(payload.context_summary("runtime"), None);
    }
}
