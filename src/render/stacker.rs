use ratatui::text::{Line, Span};

use crate::model::{FieldValue, TaskRecord};
use crate::ops::StackSort;
use crate::util::date::{format_date, is_date_field};

use super::fragment::{TableFragment, TableRow};
use super::{Fragment, RenderContext, Tasker};

/// Marker shown in the leading table column for touched tasks
pub const TOUCHED_MARKER: &str = "▶";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackLayout {
    /// One row per task, one column per selected field
    #[default]
    RawTable,
    /// Task fragments top to bottom
    Vertical,
    /// Task fragments left to right, wrapping
    Flat,
}

/// Renders an ordered collection of tasks with one Tasker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stacker {
    pub layout: StackLayout,
    pub tasker: Tasker,
    pub sort: StackSort,
}

impl Stacker {
    pub fn new(layout: StackLayout, tasker: Tasker) -> Self {
        Stacker {
            layout,
            tasker,
            sort: StackSort::None,
        }
    }

    pub fn sorted(mut self, sort: StackSort) -> Self {
        self.sort = sort;
        self
    }

    /// Zero tasks give an empty fragment of the layout's kind.
    pub fn render(&self, tasks: &[&TaskRecord], ctx: &RenderContext<'_>) -> Fragment {
        let tasks = self.sort.sort(tasks);
        match self.layout {
            StackLayout::RawTable => Fragment::Table(self.table(&tasks, ctx)),
            StackLayout::Vertical => Fragment::Column(
                tasks.iter().map(|t| self.tasker.render(t, ctx)).collect(),
            ),
            StackLayout::Flat => {
                Fragment::Flow(tasks.iter().map(|t| self.tasker.render(t, ctx)).collect())
            }
        }
    }

    fn table(&self, tasks: &[&TaskRecord], ctx: &RenderContext<'_>) -> TableFragment {
        let odd = ctx.styles.style("row.odd", None);
        let even = ctx.styles.style("row.even", None);
        let rows = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let marker = if ctx.touched.contains(&task.id()) {
                    Line::from(Span::styled(TOUCHED_MARKER, ctx.styles.style("touched", None)))
                } else {
                    Line::default()
                };
                let mut cells = vec![marker];
                for (field, value) in self.tasker.project(task) {
                    cells.push(table_cell(&field, value.as_ref(), ctx));
                }
                TableRow {
                    cells,
                    style: if i % 2 == 0 { odd } else { even },
                }
            })
            .collect();
        TableFragment { rows }
    }
}

fn table_cell(field: &str, value: Option<&FieldValue>, ctx: &RenderContext<'_>) -> Line<'static> {
    match value {
        None => Line::default(),
        Some(FieldValue::List(items)) => {
            Line::from(Span::styled(items.join(" "), ctx.styles.style(field, None)))
        }
        Some(FieldValue::Scalar(value)) if field == "description" => {
            let desc_style = ctx.styles.style("description", None);
            // Restyled only: the text stays as projected.
            match value.split_once(':') {
                Some((short, long)) => Line::from(vec![
                    Span::styled(short.to_string(), ctx.styles.style("title", None)),
                    Span::raw(":"),
                    Span::styled(long.to_string(), desc_style),
                ]),
                None => Line::from(Span::styled(value.clone(), desc_style)),
            }
        }
        Some(FieldValue::Scalar(value)) => {
            let shown = if is_date_field(field) {
                format_date(value, ctx.date_format)
            } else {
                value.clone()
            };
            Line::from(Span::styled(shown, ctx.styles.style(field, Some(value))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_helpers::{
        Fixture, fields, render_buffer, render_to_string, sample_tasks, task,
    };
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    fn refs(tasks: &[TaskRecord]) -> Vec<&TaskRecord> {
        tasks.iter().collect()
    }

    #[test]
    fn test_table_rows() {
        let fx = Fixture::plain();
        let tasks = sample_tasks();
        let stacker = Stacker::new(StackLayout::RawTable, Tasker::raw(fields(&["id", "description"])));
        assert_eq!(
            render_to_string(&stacker.render(&refs(&tasks), &fx.ctx()), 40),
            " 1 Buy milk\n 2 Fix bug: patch the thing"
        );
    }

    #[test]
    fn test_table_description_matches_projection() {
        let fx = Fixture::new(&[("color.title", "bold")], &[]);
        let tasks = vec![task(&[("id", "7"), ("description", "  a:b : c ")])];
        let tasker = Tasker::raw(fields(&["description"]));
        let projected = tasker.project(&tasks[0]);
        let Some(Some(FieldValue::Scalar(text))) = projected.get("description") else {
            panic!("description not projected");
        };
        let stacker = Stacker::new(StackLayout::RawTable, tasker.clone());
        let fragment = stacker.render(&refs(&tasks), &fx.ctx());
        let Fragment::Table(table) = &fragment else {
            panic!("expected a table");
        };
        let cell: String = table.rows[0].cells[1]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(&cell, text);
        let buf = render_buffer(&fragment, 20);
        assert_eq!(buf[(3, 0)].symbol(), "a");
        assert!(buf[(3, 0)].modifier.contains(ratatui::style::Modifier::BOLD));
    }

    #[test]
    fn test_table_touched_marker_and_absent_cells() {
        let fx = Fixture::new(&[], &["2"]);
        let tasks = vec![
            task(&[("id", "1"), ("description", "a")]),
            task(&[("id", "2"), ("description", "b"), ("project", "home")]),
        ];
        let stacker = Stacker::new(
            StackLayout::RawTable,
            Tasker::raw(fields(&["id", "project", "description"])),
        );
        assert_eq!(
            render_to_string(&stacker.render(&refs(&tasks), &fx.ctx()), 40),
            "  1      a\n▶ 2 home b"
        );
    }

    #[test]
    fn test_table_row_styles_alternate() {
        let fx = Fixture::new(&[("color.row.odd", "on blue"), ("color.row.even", "on red")], &[]);
        let tasks = sample_tasks();
        let stacker = Stacker::new(StackLayout::RawTable, Tasker::raw(fields(&["id"])));
        let buf = render_buffer(&stacker.render(&refs(&tasks), &fx.ctx()), 10);
        assert_eq!(buf[(9, 0)].bg, Color::Blue);
        assert_eq!(buf[(9, 1)].bg, Color::Red);
    }

    #[test]
    fn test_table_formats_dates() {
        let fx = Fixture::plain();
        let tasks = vec![task(&[("id", "1"), ("due", "20240115T120000Z")])];
        let stacker = Stacker::new(StackLayout::RawTable, Tasker::raw(fields(&["id", "due"])));
        assert_eq!(
            render_to_string(&stacker.render(&refs(&tasks), &fx.ctx()), 40),
            " 1 2024-01-15"
        );
    }

    #[test]
    fn test_sort_applied_before_rendering() {
        let fx = Fixture::plain();
        let tasks = vec![
            task(&[("id", "1"), ("priority", "L")]),
            task(&[("id", "2")]),
            task(&[("id", "3"), ("priority", "H")]),
        ];
        let stacker = Stacker::new(StackLayout::Vertical, Tasker::raw(fields(&["id"])))
            .sorted(StackSort::by("priority", false));
        assert_eq!(
            render_to_string(&stacker.render(&refs(&tasks), &fx.ctx()), 40),
            "3\n1\n2"
        );
    }

    #[test]
    fn test_zero_tasks_render_empty_fragment() {
        let fx = Fixture::plain();
        for layout in [StackLayout::RawTable, StackLayout::Vertical, StackLayout::Flat] {
            let stacker = Stacker::new(layout, Tasker::raw(fields(&["id"])));
            let fragment = stacker.render(&[], &fx.ctx());
            assert!(fragment.is_empty());
            assert_eq!(fragment.height(40), 0);
        }
    }

    #[test]
    fn test_flat_packs_cards() {
        let fx = Fixture::plain();
        let tasks = vec![
            task(&[("id", "1"), ("description", "a")]),
            task(&[("id", "2"), ("description", "b")]),
        ];
        let stacker = Stacker::new(StackLayout::Flat, Tasker::card(fields(&["id", "description"])));
        let out = render_to_string(&stacker.render(&refs(&tasks), &fx.ctx()), 40);
        assert_eq!(out, "╭1:a──╮ ╭2:b──╮\n╰─────╯ ╰─────╯");
    }
}
