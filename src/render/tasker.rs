use indexmap::IndexMap;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::BorderType;

use crate::model::{FieldValue, TaskRecord, split_description};
use crate::util::date::{format_date, is_date_field};
use crate::util::unicode::display_width;
use crate::util::wrap::wrap_text;

use super::{Fragment, RenderContext};

pub const DEFAULT_CARD_WRAP: usize = 25;

/// Selected fields of one task; `None` marks a selected field the task lacks.
pub type Projection = IndexMap<String, Option<FieldValue>>;

/// Delimiters drawn around each token of a list field, e.g. `[` and `]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEnds {
    pub open: String,
    pub close: String,
}

impl ListEnds {
    /// First character opens, the rest closes. `""` means no delimiters.
    pub fn parse(value: &str) -> Self {
        let mut chars = value.chars();
        let open = chars.next().map(String::from).unwrap_or_default();
        ListEnds {
            open,
            close: chars.as_str().to_string(),
        }
    }
}

impl Default for ListEnds {
    fn default() -> Self {
        ListEnds::parse("[]")
    }
}

/// Renders a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tasker {
    /// Field projection, shown as one line
    Raw { fields: Vec<String> },
    /// Titled box with wrapped description and one line per other field
    Card {
        fields: Vec<String>,
        wrap: usize,
        ends: ListEnds,
    },
}

impl Tasker {
    pub fn raw(fields: Vec<String>) -> Self {
        Tasker::Raw { fields }
    }

    pub fn card(fields: Vec<String>) -> Self {
        Tasker::Card {
            fields,
            wrap: DEFAULT_CARD_WRAP,
            ends: ListEnds::default(),
        }
    }

    /// The selected fields
    pub fn fields(&self) -> &[String] {
        match self {
            Tasker::Raw { fields } | Tasker::Card { fields, .. } => fields,
        }
    }

    /// Selected fields, or every field of `task` when none are selected.
    fn fields_for(&self, task: &TaskRecord) -> Vec<String> {
        if self.fields().is_empty() {
            task.field_names().map(str::to_string).collect()
        } else {
            self.fields().to_vec()
        }
    }

    /// Restrict `task` to the selected fields, in selection order. Values
    /// are copied unchanged.
    pub fn project(&self, task: &TaskRecord) -> Projection {
        self.fields_for(task)
            .into_iter()
            .map(|f| {
                let value = task.get(&f).cloned();
                (f, value)
            })
            .collect()
    }

    pub fn render(&self, task: &TaskRecord, ctx: &RenderContext<'_>) -> Fragment {
        match self {
            Tasker::Raw { .. } => self.render_raw(task, ctx),
            Tasker::Card { wrap, ends, .. } => self.render_card(task, *wrap, ends, ctx),
        }
    }

    fn render_raw(&self, task: &TaskRecord, ctx: &RenderContext<'_>) -> Fragment {
        let mut spans = Vec::new();
        if ctx.touched.contains(&task.id()) {
            spans.push(Span::styled("▶", ctx.styles.style("touched", None)));
        }
        for (field, value) in self.project(task) {
            let Some(value) = value else { continue };
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            let style = ctx.styles.style(&field, value.as_scalar());
            spans.push(Span::styled(value.joined(), style));
        }
        Fragment::Text(Text::from(Line::from(spans)))
    }

    fn render_card(
        &self,
        task: &TaskRecord,
        wrap: usize,
        ends: &ListEnds,
        ctx: &RenderContext<'_>,
    ) -> Fragment {
        let id = task.id();
        let description = task.description().trim();
        let id_style = ctx.styles.style("id", None);
        let title_style = ctx.styles.style("title", None);
        let desc_style = ctx.styles.style("description", None);

        let mut title = vec![Span::styled(id.clone(), id_style)];
        let long = match split_description(description) {
            (Some(short), long) => {
                title.push(Span::raw(":"));
                title.push(Span::styled(short.to_string(), title_style));
                long
            }
            (None, whole) if display_width(whole) <= wrap => {
                if !whole.is_empty() {
                    title.push(Span::raw(":"));
                    title.push(Span::styled(whole.to_string(), title_style));
                }
                ""
            }
            (None, whole) => whole,
        };

        let mut body: Vec<Line<'static>> = wrap_text(long, wrap)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, desc_style)))
            .collect();

        for field in self.fields_for(task) {
            if field == "id" || field == "description" {
                continue;
            }
            match task.get(&field) {
                Some(FieldValue::Scalar(value)) => {
                    let shown = if is_date_field(&field) {
                        format_date(value, ctx.date_format)
                    } else {
                        value.clone()
                    };
                    let style = ctx.styles.style(&field, Some(value));
                    body.push(Line::from(Span::styled(format!("{field}: {shown}"), style)));
                }
                Some(FieldValue::List(items)) => {
                    body.extend(list_lines(&field, items, ends, wrap, ctx));
                }
                None => {}
            }
        }

        let panel = Fragment::panel(Line::from(title), Fragment::Text(Text::from(body)));
        let panel = if ctx.touched.contains(&id) {
            panel
                .border_type(BorderType::Double)
                .border_style(ctx.styles.style("touched", None))
        } else {
            panel
        };
        panel.into()
    }
}

/// Delimiter-wrapped tokens packed into lines no wider than `wrap`.
fn list_lines(
    field: &str,
    items: &[String],
    ends: &ListEnds,
    wrap: usize,
    ctx: &RenderContext<'_>,
) -> Vec<Line<'static>> {
    let ends_style = ctx.styles.style(&format!("{field}.ends"), None);
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut col = 0;
    for item in items {
        let w = display_width(&ends.open) + display_width(item) + display_width(&ends.close);
        if col > 0 && col + 1 + w > wrap {
            lines.push(Line::from(std::mem::take(&mut spans)));
            col = 0;
        }
        if col > 0 {
            spans.push(Span::raw(" "));
            col += 1;
        }
        spans.push(Span::styled(ends.open.clone(), ends_style));
        spans.push(Span::styled(item.clone(), ctx.styles.style(field, Some(item))));
        spans.push(Span::styled(ends.close.clone(), ends_style));
        col += w;
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}
