use unicode_segmentation::UnicodeSegmentation;

use super::unicode::{display_width, grapheme_display_width};

/// Greedy word wrap of `text` into lines of at most `width` cells.
///
/// Word boundary rules (priority order):
/// 1. Whitespace (runs collapse to one space)
/// 2. After a hyphen inside a word, e.g. `well-|known`
/// 3. Grapheme wrap, when a single token is wider than `width`
///
/// A width of 0 disables wrapping.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
        return if joined.is_empty() { Vec::new() } else { vec![joined] };
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut col = 0;

    for word in text.split_whitespace() {
        for (j, piece) in hyphen_pieces(word).into_iter().enumerate() {
            let sep = usize::from(j == 0 && !current.is_empty());
            let pw = display_width(piece);
            if col + sep + pw <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(piece);
                col += sep + pw;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                col = 0;
            }
            if pw <= width {
                current.push_str(piece);
                col = pw;
                continue;
            }
            // Token wider than the line: grapheme-wrap it
            for g in piece.graphemes(true) {
                let gw = grapheme_display_width(g);
                if col + gw > width && col > 0 {
                    lines.push(std::mem::take(&mut current));
                    col = 0;
                }
                current.push_str(g);
                col += gw;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a word after each hyphen that follows a letter or digit.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev_alnum = false;
    for (i, c) in word.char_indices() {
        let end = i + c.len_utf8();
        if c == '-' && prev_alnum && end < word.len() {
            pieces.push(&word[start..end]);
            start = end;
        }
        prev_alnum = c.is_alphanumeric();
    }
    pieces.push(&word[start..]);
    pieces
}
