use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Cell, Padding, Paragraph, Row, Table, Widget};

/// Border plus horizontal padding, on both sides
const PANEL_CHROME: u16 = 4;

/// A display fragment: a small layout tree rendered into a ratatui buffer.
///
/// Every widget in the pipeline produces one of these, so a Sectioner can
/// nest another Sectioner exactly where it would hold a flat stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Pre-wrapped styled lines
    Text(Text<'static>),
    /// Bordered, titled frame around a body
    Panel(Box<Panel>),
    /// Rows of single-line cells sharing natural column widths
    Table(TableFragment),
    /// Children stacked top to bottom
    Column(Vec<Fragment>),
    /// Children side by side, each given an equal share of the width
    Row(Vec<Fragment>),
    /// Children packed left to right, wrapping to the available width
    Flow(Vec<Fragment>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Line<'static>,
    pub body: Fragment,
    pub border_style: Style,
    pub border_type: BorderType,
    /// Take the whole available width instead of fitting the content
    pub expand: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFragment {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<Line<'static>>,
    pub style: Style,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        match self {
            Fragment::Text(text) => text.lines.is_empty(),
            Fragment::Panel(_) => false,
            Fragment::Table(table) => table.rows.is_empty(),
            Fragment::Column(children) | Fragment::Row(children) | Fragment::Flow(children) => {
                children.iter().all(Fragment::is_empty)
            }
        }
    }

    pub fn panel(title: Line<'static>, body: Fragment) -> Panel {
        Panel {
            title,
            body,
            border_style: Style::default(),
            border_type: BorderType::Rounded,
            expand: false,
        }
    }

    /// Width the fragment would take with unlimited room
    pub fn natural_width(&self) -> u16 {
        match self {
            Fragment::Text(text) => clamp(text.width()),
            Fragment::Panel(panel) => panel
                .body
                .natural_width()
                .max(clamp(panel.title.width()))
                .saturating_add(PANEL_CHROME),
            Fragment::Table(table) => table.natural_width(),
            Fragment::Column(children) => {
                children.iter().map(Fragment::natural_width).max().unwrap_or(0)
            }
            Fragment::Row(children) => children
                .iter()
                .fold(0u16, |acc, c| acc.saturating_add(c.natural_width())),
            Fragment::Flow(children) => {
                let gaps = children.len().saturating_sub(1);
                children
                    .iter()
                    .fold(clamp(gaps), |acc, c| acc.saturating_add(c.natural_width()))
            }
        }
    }

    /// Rows needed when laid out in `width` columns
    pub fn height(&self, width: u16) -> u16 {
        match self {
            Fragment::Text(text) => clamp(text.height()),
            Fragment::Panel(panel) => {
                let outer = panel.width_in(width);
                panel
                    .body
                    .height(outer.saturating_sub(PANEL_CHROME))
                    .saturating_add(2)
            }
            Fragment::Table(table) => clamp(table.rows.len()),
            Fragment::Column(children) => children
                .iter()
                .fold(0u16, |acc, c| acc.saturating_add(c.height(width))),
            Fragment::Row(children) => {
                let cols = split_row(Rect::new(0, 0, width, 1), children.len());
                children
                    .iter()
                    .zip(cols.iter())
                    .map(|(c, col)| c.height(col.width))
                    .max()
                    .unwrap_or(0)
            }
            Fragment::Flow(children) => flow_lines(children, width)
                .iter()
                .fold(0u16, |acc, line| acc.saturating_add(line.height)),
        }
    }

    /// Draw into `area` of `buf`. Content beyond the area is clipped.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        match self {
            Fragment::Text(text) => Paragraph::new(text.clone()).render(area, buf),
            Fragment::Panel(panel) => panel.render(area, buf),
            Fragment::Table(table) => table.render(area, buf),
            Fragment::Column(children) => {
                let mut y = area.y;
                for child in children {
                    let bottom = area.bottom();
                    if y >= bottom {
                        break;
                    }
                    let h = child.height(area.width).min(bottom - y);
                    child.render(Rect::new(area.x, y, area.width, h), buf);
                    y += h;
                }
            }
            Fragment::Row(children) => {
                let cols = split_row(area, children.len());
                for (child, col) in children.iter().zip(cols.iter()) {
                    child.render(*col, buf);
                }
            }
            Fragment::Flow(children) => {
                let mut y = area.y;
                for line in flow_lines(children, area.width) {
                    let bottom = area.bottom();
                    if y >= bottom {
                        break;
                    }
                    let h = line.height.min(bottom - y);
                    let mut x = area.x;
                    for (idx, w) in line.items {
                        children[idx].render(Rect::new(x, y, w, h), buf);
                        x = x.saturating_add(w).saturating_add(1);
                    }
                    y += h;
                }
            }
        }
    }
}

impl From<Panel> for Fragment {
    fn from(panel: Panel) -> Self {
        Fragment::Panel(Box::new(panel))
    }
}

impl Panel {
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    fn width_in(&self, available: u16) -> u16 {
        if self.expand {
            available
        } else {
            let natural = self
                .body
                .natural_width()
                .max(clamp(self.title.width()))
                .saturating_add(PANEL_CHROME);
            natural.min(available)
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let width = self.width_in(area.width);
        let height = self
            .body
            .height(width.saturating_sub(PANEL_CHROME))
            .saturating_add(2)
            .min(area.height);
        let outer = Rect::new(area.x, area.y, width, height);
        let block = Block::bordered()
            .title(self.title.clone())
            .border_type(self.border_type)
            .border_style(self.border_style)
            .padding(Padding::horizontal(1));
        let inner = block.inner(outer);
        block.render(outer, buf);
        self.body.render(inner, buf);
    }
}

impl TableFragment {
    fn column_widths(&self) -> Vec<u16> {
        let columns = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        (0..columns)
            .map(|i| {
                self.rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|cell| clamp(cell.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn natural_width(&self) -> u16 {
        let widths = self.column_widths();
        let spacing = clamp(widths.len().saturating_sub(1));
        widths.iter().fold(spacing, |acc, w| acc.saturating_add(*w))
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let widths: Vec<Constraint> = self
            .column_widths()
            .into_iter()
            .map(Constraint::Length)
            .collect();
        let rows = self.rows.iter().map(|row| {
            Row::new(row.cells.iter().cloned().map(Cell::from)).style(row.style)
        });
        Table::new(rows, widths).column_spacing(1).render(area, buf);
    }
}

fn split_row(area: Rect, n: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    let share = u32::try_from(n).unwrap_or(u32::MAX);
    Layout::horizontal(vec![Constraint::Ratio(1, share); n])
        .split(area)
        .to_vec()
}

struct FlowLine {
    /// (child index, allotted width)
    items: Vec<(usize, u16)>,
    height: u16,
}

fn flow_lines(children: &[Fragment], width: u16) -> Vec<FlowLine> {
    let mut lines: Vec<FlowLine> = Vec::new();
    let mut x: u16 = 0;
    for (idx, child) in children.iter().enumerate() {
        let w = child.natural_width().min(width);
        let h = child.height(w);
        match lines.last_mut() {
            Some(line) if x.saturating_add(1).saturating_add(w) <= width => {
                x = x.saturating_add(1).saturating_add(w);
                line.items.push((idx, w));
                line.height = line.height.max(h);
            }
            _ => {
                x = w;
                lines.push(FlowLine {
                    items: vec![(idx, w)],
                    height: h,
                });
            }
        }
    }
    lines
}

fn clamp(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
