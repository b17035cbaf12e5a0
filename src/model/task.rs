use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Value of one task field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single string (numbers and booleans are kept in their textual form)
    Scalar(String),
    /// An ordered list of strings, e.g. `tags`
    List(Vec<String>),
}

impl FieldValue {
    /// Convert a JSON value exported by the backend. `null` means absent.
    pub fn from_json(value: serde_json::Value) -> Option<FieldValue> {
        use serde_json::Value;
        match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Scalar(s)),
            Value::Bool(b) => Some(FieldValue::Scalar(b.to_string())),
            Value::Number(n) => Some(FieldValue::Scalar(n.to_string())),
            Value::Array(items) => Some(FieldValue::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            obj @ Value::Object(_) => Some(FieldValue::Scalar(obj.to_string())),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// Flatten to a single display string (list items joined by a space)
    pub fn joined(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::List(items) => items.join(" "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(s.to_string())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// One task as exported by the backend: an ordered field → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskRecord {
    fields: IndexMap<String, FieldValue>,
}

impl TaskRecord {
    pub fn new() -> Self {
        TaskRecord::default()
    }

    /// Builder-style insert, mostly for tests and flat-file sources.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Scalar value of a field, `None` if absent or list-valued
    pub fn scalar(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_scalar)
    }

    /// Textual identifier: `id`, falling back to `uuid`, then empty.
    pub fn id(&self) -> String {
        self.get("id")
            .or_else(|| self.get("uuid"))
            .map(FieldValue::joined)
            .unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.scalar("description").unwrap_or("")
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FromIterator<(String, FieldValue)> for TaskRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        TaskRecord {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for TaskRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| FieldValue::from_json(v).map(|v| (k, v)))
            .collect())
    }
}

/// Split a description into a short title and a long body on the first colon.
///
/// `"Fix bug: patch the thing"` → `(Some("Fix bug"), "patch the thing")`.
/// Prose that happens to contain a colon is split all the same.
pub fn split_description(text: &str) -> (Option<&str>, &str) {
    match text.split_once(':') {
        Some((short, long)) => (Some(short.trim()), long.trim()),
        None => (None, text.trim()),
    }
}
