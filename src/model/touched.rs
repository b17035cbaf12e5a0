use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static TOUCHED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:Modifying|Created|Starting|Stopping) task (\d+)")
        .expect("touched pattern is a valid regex")
});

/// Ids of the tasks changed by the most recent mutating backend command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedSet {
    ids: HashSet<String>,
}

impl TouchedSet {
    pub fn new() -> Self {
        TouchedSet::default()
    }

    /// Scan backend output for lines like `Modifying task 3 'foo'.`
    pub fn from_backend_output(out: &str) -> Self {
        TOUCHED_RE
            .captures_iter(out)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for TouchedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        TouchedSet {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_output() {
        let out = "\
Modifying task 3 'Buy milk'.
Modified 1 task.
Created task 12.
Starting task 4 'Fix bug'.
Stopping task 5 'Paint'.
Deleting task 9 'Gone'.
";
        let touched = TouchedSet::from_backend_output(out);
        assert_eq!(touched.len(), 4);
        for id in ["3", "12", "4", "5"] {
            assert!(touched.contains(id), "missing {id}");
        }
        assert!(!touched.contains("9"));
    }

    #[test]
    fn test_report_output_touches_nothing() {
        let out = "ID Age Description\n 1 2d  Buy milk\n\n1 task\n";
        assert!(TouchedSet::from_backend_output(out).is_empty());
    }
}
