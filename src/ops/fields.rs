use std::collections::HashSet;

use crate::model::{ConfigMap, TaskRecord};

/// Attributes every backend task may carry, whether or not any loaded task has them
pub const BACKEND_FIELDS: &[&str] = &[
    "id",
    "uuid",
    "description",
    "status",
    "project",
    "priority",
    "tags",
    "depends",
    "annotations",
    "urgency",
    "entry",
    "modified",
    "start",
    "end",
    "due",
    "wait",
    "scheduled",
    "until",
    "recur",
    "mask",
    "imask",
    "parent",
];

/// Selected fields that no task, backend attribute, or UDA declaration knows about
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field(s) selected for display: {}", .fields.join(", "))]
pub struct FieldError {
    pub fields: Vec<String>,
}

/// Check every selected field at once, reporting all unknown ones together.
pub fn validate_fields(
    selected: &[String],
    tasks: &[TaskRecord],
    config: &ConfigMap,
) -> Result<(), FieldError> {
    let mut known: HashSet<&str> = BACKEND_FIELDS.iter().copied().collect();
    for task in tasks {
        known.extend(task.field_names());
    }
    for (key, _) in config.with_prefix("uda.") {
        if let Some(name) = key.strip_prefix("uda.").and_then(|k| k.strip_suffix(".type")) {
            known.insert(name);
        }
    }

    let unknown: Vec<String> = selected
        .iter()
        .filter(|f| !known.contains(f.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(FieldError { fields: unknown })
    }
}
