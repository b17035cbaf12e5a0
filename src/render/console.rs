use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthStr;

use super::Fragment;

pub const DEFAULT_WIDTH: u16 = 80;

/// Output width: an explicit value wins, then the terminal size, then 80.
pub fn terminal_width(explicit: Option<u16>) -> u16 {
    explicit
        .filter(|w| *w > 0)
        .or_else(|| crossterm::terminal::size().ok().map(|(w, _)| w))
        .filter(|w| *w > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Colors are off when asked to, or when `NO_COLOR` is set to anything non-empty.
pub fn color_enabled(no_color: bool) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}

/// Lay the fragment out at `width` into a buffer exactly as tall as it needs.
pub fn render_to_buffer(root: &Fragment, width: u16) -> Buffer {
    let area = Rect::new(0, 0, width, root.height(width));
    let mut buf = Buffer::empty(area);
    root.render(area, &mut buf);
    buf
}

/// Buffer rows as text, trailing blanks trimmed.
pub fn plain_lines(buf: &Buffer) -> Vec<String> {
    rows(buf)
        .map(|row| {
            let s: String = visible_cells(row).map(Cell::symbol).collect();
            s.trim_end().to_string()
        })
        .collect()
}

pub fn write_plain(buf: &Buffer, out: &mut impl Write) -> io::Result<()> {
    for line in plain_lines(buf) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Emit the buffer as ANSI-styled text, one terminal line per buffer row.
pub fn write_ansi(buf: &Buffer, out: &mut impl Write) -> io::Result<()> {
    for row in rows(buf) {
        let cells: Vec<&Cell> = visible_cells(row).collect();
        let end = cells
            .iter()
            .rposition(|c| !is_blank(c))
            .map_or(0, |i| i + 1);

        let mut current = Style::default();
        for cell in &cells[..end] {
            let style = cell_style(cell);
            if style != current {
                if current != Style::default() {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                }
                apply_style(out, style)?;
                current = style;
            }
            queue!(out, Print(cell.symbol()))?;
        }
        if current != Style::default() {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

fn rows(buf: &Buffer) -> impl Iterator<Item = &[Cell]> {
    let w = usize::from(buf.area.width).max(1);
    buf.content.chunks(w)
}

/// Skip the filler cells that follow a wide character.
fn visible_cells(row: &[Cell]) -> impl Iterator<Item = &Cell> {
    let mut skip = 0usize;
    row.iter().filter(move |cell| {
        if skip > 0 {
            skip -= 1;
            return false;
        }
        skip = cell.symbol().width().saturating_sub(1);
        true
    })
}

fn is_blank(cell: &Cell) -> bool {
    cell.symbol() == " " && cell.bg == Color::Reset && !cell.modifier.intersects(visible_on_blank())
}

fn visible_on_blank() -> Modifier {
    Modifier::REVERSED | Modifier::UNDERLINED | Modifier::CROSSED_OUT
}

fn cell_style(cell: &Cell) -> Style {
    let mut style = Style::default();
    if cell.fg != Color::Reset {
        style = style.fg(cell.fg);
    }
    if cell.bg != Color::Reset {
        style = style.bg(cell.bg);
    }
    if !cell.modifier.is_empty() {
        style = style.add_modifier(cell.modifier);
    }
    style
}

fn apply_style(out: &mut impl Write, style: Style) -> io::Result<()> {
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(term_color(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(term_color(bg)))?;
    }
    for attr in attributes(style.add_modifier) {
        queue!(out, SetAttribute(attr))?;
    }
    Ok(())
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

fn attributes(modifier: Modifier) -> Vec<Attribute> {
    [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::SLOW_BLINK, Attribute::SlowBlink),
        (Modifier::RAPID_BLINK, Attribute::RapidBlink),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::HIDDEN, Attribute::Hidden),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(|(m, _)| modifier.contains(*m))
    .map(|(_, a)| a)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::text::{Line, Span, Text};

    fn styled(content: &str, style: Style) -> Fragment {
        Fragment::Text(Text::from(Line::from(Span::styled(content.to_string(), style))))
    }

    #[test]
    fn test_explicit_width_wins() {
        assert_eq!(terminal_width(Some(42)), 42);
    }

    #[test]
    fn test_buffer_height_matches_fragment() {
        let f = Fragment::Column(vec![styled("a", Style::default()), styled("b", Style::default())]);
        let buf = render_to_buffer(&f, 10);
        assert_eq!(buf.area.height, 2);
        assert_eq!(plain_lines(&buf), vec!["a", "b"]);
    }

    #[test]
    fn test_wide_characters_not_padded() {
        let buf = render_to_buffer(&styled("日本 x", Style::default()), 10);
        assert_eq!(plain_lines(&buf), vec!["日本 x"]);
    }

    #[test]
    fn test_ansi_output() {
        let style = Style::default().fg(Color::Indexed(214)).add_modifier(Modifier::BOLD);
        let buf = render_to_buffer(&styled("12", style), 6);
        let mut out = Vec::new();
        write_ansi(&buf, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\u{1b}[38;5;214m\u{1b}[1m12\u{1b}[0m\u{1b}[0m\n");
    }

    #[test]
    fn test_unstyled_ansi_is_plain() {
        let buf = render_to_buffer(&styled("plain", Style::default()), 10);
        let mut out = Vec::new();
        write_ansi(&buf, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "plain\n");
    }

    #[test]
    fn test_background_keeps_trailing_space() {
        let buf = render_to_buffer(&styled("a ", Style::default().bg(Color::Blue)), 4);
        let mut out = Vec::new();
        write_plain(&buf, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\n");

        let mut out = Vec::new();
        write_ansi(&buf, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a "));
    }
}
