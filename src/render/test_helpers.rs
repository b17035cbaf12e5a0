use ratatui::buffer::Buffer;

use crate::model::{ConfigMap, TaskRecord, TouchedSet};
use crate::render::console::{plain_lines, render_to_buffer};
use crate::render::{Fragment, RenderContext};
use crate::style::StyleResolver;

/// Render a fragment at `width` and return plain text (no styles).
pub fn render_to_string(fragment: &Fragment, width: u16) -> String {
    let lines = plain_lines(&render_to_buffer(fragment, width));
    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render a fragment and keep the styled buffer for style assertions.
pub fn render_buffer(fragment: &Fragment, width: u16) -> Buffer {
    render_to_buffer(fragment, width)
}

/// Owned pieces a `RenderContext` borrows from.
pub struct Fixture {
    pub styles: StyleResolver,
    pub touched: TouchedSet,
}

impl Fixture {
    pub fn new(config: &[(&str, &str)], touched: &[&str]) -> Self {
        let config: ConfigMap = config.iter().copied().collect();
        Fixture {
            styles: StyleResolver::new(&config),
            touched: touched.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn plain() -> Self {
        Fixture::new(&[], &[])
    }

    pub fn ctx(&self) -> RenderContext<'_> {
        RenderContext {
            styles: &self.styles,
            touched: &self.touched,
            date_format: "%Y-%m-%d",
        }
    }
}

pub fn task(fields: &[(&str, &str)]) -> TaskRecord {
    fields
        .iter()
        .fold(TaskRecord::new(), |t, (k, v)| t.with(k, *v))
}

/// The two tasks of the pending/completed walkthrough.
pub fn sample_tasks() -> Vec<TaskRecord> {
    vec![
        task(&[("id", "1"), ("status", "pending"), ("description", "Buy milk")]),
        task(&[
            ("id", "2"),
            ("status", "completed"),
            ("description", "Fix bug: patch the thing"),
        ]),
    ]
}

pub fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
