//! Color literal normalization, applied to color-valued configuration
//! entries when they are merged.

/// Rewrite every color token of a style descriptor into its canonical form.
///
/// - `color214` → `color(214)`
/// - `#4e9` → `#44ee99`
/// - `rgb520` → `color(208)` (6×6×6 cube, each digit 0–5)
/// - `gray12` / `grey12` → `color(244)` (24-step ramp)
///
/// Anything else is kept verbatim.
pub fn normalize_color(value: &str) -> String {
    value
        .split_whitespace()
        .map(normalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_token(token: &str) -> String {
    if let Some(index) = indexed(token) {
        return format!("color({index})");
    }
    if let Some(hex) = short_hex(token) {
        return hex;
    }
    if let Some(index) = cube(token) {
        return format!("color({index})");
    }
    if let Some(index) = ramp(token) {
        return format!("color({index})");
    }
    token.to_string()
}

fn indexed(token: &str) -> Option<u8> {
    let digits = token.strip_prefix("color")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn short_hex(token: &str) -> Option<String> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 3 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut out = String::with_capacity(7);
    out.push('#');
    for c in hex.chars() {
        out.push(c);
        out.push(c);
    }
    Some(out)
}

fn cube(token: &str) -> Option<u8> {
    let digits = token.strip_prefix("rgb")?.as_bytes();
    if digits.len() != 3 || !digits.iter().all(|b| (b'0'..=b'5').contains(b)) {
        return None;
    }
    let [r, g, b] = [digits[0] - b'0', digits[1] - b'0', digits[2] - b'0'];
    Some(16 + 36 * r + 6 * g + b)
}

fn ramp(token: &str) -> Option<u8> {
    let digits = token
        .strip_prefix("gray")
        .or_else(|| token.strip_prefix("grey"))?;
    let n: u8 = digits.parse().ok()?;
    (n < 24).then_some(232 + n)
}

/// Whether the word starting right after a `#` is a 3- or 6-digit hex literal
pub(crate) fn is_hex_literal(word: &str) -> bool {
    (word.len() == 3 || word.len() == 6) && word.bytes().all(|b| b.is_ascii_hexdigit())
}
