use indexmap::IndexMap;

use crate::model::{FieldValue, TaskRecord};

/// Buckets of tasks keyed by group value, in first-seen order
pub type Groups<'a> = IndexMap<String, Vec<&'a TaskRecord>>;

/// Synthetic status bucket for tasks that have been started
pub const STARTED: &str = "started";

/// Field whose presence marks a task as in progress
pub const START_FIELD: &str = "start";

/// How tasks are partitioned into sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    /// Bucket by the value of a field; tasks without it go under `""`
    Field(String),
    /// Bucket by `status`, except that started tasks go under `started`
    Status,
}

impl Grouping {
    /// `status` gets the started-aware grouping, anything else groups by field.
    pub fn by(field: &str) -> Grouping {
        if field == "status" {
            Grouping::Status
        } else {
            Grouping::Field(field.to_string())
        }
    }

    /// The field this grouping reads, also the semantic key of section titles
    pub fn field(&self) -> &str {
        match self {
            Grouping::Field(f) => f,
            Grouping::Status => "status",
        }
    }

    /// Partition `tasks` without touching the input. Order within a bucket
    /// follows input order.
    pub fn group<'a>(&self, tasks: &[&'a TaskRecord]) -> Groups<'a> {
        let mut groups: Groups<'a> = IndexMap::new();
        for &task in tasks {
            let key = match self {
                Grouping::Status if task.has(START_FIELD) => STARTED.to_string(),
                _ => group_key(task.get(self.field())),
            };
            groups.entry(key).or_default().push(task);
        }
        groups
    }
}

fn group_key(value: Option<&FieldValue>) -> String {
    value.map(FieldValue::joined).unwrap_or_default()
}

/// Which group keys are rendered, and in which order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SectionOrder {
    /// Whatever order the grouping produced
    #[default]
    AsGrouped,
    /// Exactly these keys, in this order; other groups are not rendered
    OnValues(Vec<String>),
}

impl SectionOrder {
    /// Keys to render: the ordering restricted to keys present in `groups`.
    pub fn keys<'g>(&'g self, groups: &'g Groups<'_>) -> Vec<&'g str> {
        match self {
            SectionOrder::AsGrouped => groups.keys().map(String::as_str).collect(),
            SectionOrder::OnValues(values) => values
                .iter()
                .map(String::as_str)
                .filter(|k| groups.contains_key(*k))
                .collect(),
        }
    }
}
