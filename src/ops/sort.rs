use std::cmp::Ordering;

use crate::model::{FieldValue, TaskRecord};

/// Ordering applied to the tasks of one stack before rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StackSort {
    /// Keep input order
    #[default]
    None,
    /// By field value; tasks without the field always come last
    Field { field: String, reverse: bool },
    /// By the `priority` enumeration: H, M, L, then none
    Priority { reverse: bool },
}

impl StackSort {
    /// `priority` sorts by rank, any other field by value.
    pub fn by(field: &str, reverse: bool) -> StackSort {
        if field == "priority" {
            StackSort::Priority { reverse }
        } else {
            StackSort::Field {
                field: field.to_string(),
                reverse,
            }
        }
    }

    /// Return a sorted copy. The sort is stable.
    pub fn sort<'a>(&self, tasks: &[&'a TaskRecord]) -> Vec<&'a TaskRecord> {
        let mut sorted = tasks.to_vec();
        match self {
            StackSort::None => {}
            StackSort::Field { field, reverse } => {
                sorted.sort_by(|a, b| match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => {
                        let o = compare_values(x, y);
                        if *reverse { o.reverse() } else { o }
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
            }
            StackSort::Priority { reverse } => {
                sorted.sort_by(|a, b| {
                    let o = priority_rank(a.scalar("priority")).cmp(&priority_rank(b.scalar("priority")));
                    if *reverse { o.reverse() } else { o }
                });
            }
        }
        sorted
    }
}

/// Rank of a priority value: H=0, M=1, L=2, anything else (or none)=3
pub fn priority_rank(value: Option<&str>) -> u8 {
    match value {
        Some("H") => 0,
        Some("M") => 1,
        Some("L") => 2,
        _ => 3,
    }
}

/// Numbers compare numerically (ids, urgency), everything else as text.
fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_scalar(), b.as_scalar()) {
        if let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
    }
    a.joined().cmp(&b.joined())
}
