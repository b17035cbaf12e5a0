use ratatui::style::{Color, Modifier, Style};

/// Parse a style descriptor like `"bold color(214) on #262121"` into a Style.
///
/// Color tokens before `on` set the foreground, after it the background.
/// Unknown tokens are ignored.
pub fn parse_style(descriptor: &str) -> Style {
    let mut style = Style::default();
    let mut background = false;
    let mut bright = false;

    for token in descriptor.split_whitespace() {
        let token = token.to_ascii_lowercase();
        if token == "on" {
            background = true;
            continue;
        }
        if token == "bright" {
            bright = true;
            continue;
        }
        if let Some(modifier) = parse_modifier(&token) {
            style = style.add_modifier(modifier);
            continue;
        }
        let color = if bright {
            parse_color(&format!("bright_{token}"))
        } else {
            parse_color(&token)
        };
        bright = false;
        match color {
            Some(c) if background => style = style.bg(c),
            Some(c) => style = style.fg(c),
            None => tracing::debug!(token = %token, "ignoring unknown style token"),
        }
    }
    style
}

fn parse_modifier(token: &str) -> Option<Modifier> {
    let m = match token {
        "bold" => Modifier::BOLD,
        "dim" => Modifier::DIM,
        "italic" => Modifier::ITALIC,
        "underline" | "underlined" => Modifier::UNDERLINED,
        "blink" => Modifier::SLOW_BLINK,
        "reverse" | "inverse" => Modifier::REVERSED,
        "strike" | "strikethrough" => Modifier::CROSSED_OUT,
        _ => return None,
    };
    Some(m)
}

/// Parse a single (lowercase) color token
pub fn parse_color(token: &str) -> Option<Color> {
    let c = match token {
        "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::Gray,
        "bright_black" => Color::DarkGray,
        "bright_red" => Color::LightRed,
        "bright_green" => Color::LightGreen,
        "bright_yellow" => Color::LightYellow,
        "bright_blue" => Color::LightBlue,
        "bright_magenta" => Color::LightMagenta,
        "bright_cyan" => Color::LightCyan,
        "bright_white" => Color::White,
        _ => return parse_indexed(token).or_else(|| parse_hex_color(token)),
    };
    Some(c)
}

fn parse_indexed(token: &str) -> Option<Color> {
    let inner = token.strip_prefix("color(")?.strip_suffix(')')?;
    inner.trim().parse::<u8>().ok().map(Color::Indexed)
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
