use std::collections::HashMap;

use ratatui::style::Style;

use crate::model::ConfigMap;
use crate::model::config::split_list;

use super::parse::parse_style;

/// Maps a semantic key (and optional value) to a style descriptor drawn from
/// the `color.*` entries of the configuration.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    styles: HashMap<String, String>,
    precedence: Vec<String>,
}

impl StyleResolver {
    pub fn new(config: &ConfigMap) -> Self {
        let styles = config
            .with_prefix("color.")
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let precedence = config
            .get("rule.precedence.color")
            .map(|v| split_list(v, ','))
            .unwrap_or_default();
        StyleResolver { styles, precedence }
    }

    /// Resolve the style descriptor for `key`, refined by `value` if given.
    ///
    /// Candidates are `color.<key>` and `color.<key>.<value>` (whitespace in
    /// the value replaced by `_`). A foreground-only entry and a
    /// background-only entry are combined as `"<fg> <bg>"`. Otherwise the
    /// value-level entry wins, unless `rule.precedence.color` names a
    /// substring of one of the two keys (value-level key checked first).
    pub fn resolve(&self, key: &str, value: Option<&str>) -> String {
        let key_level = format!("color.{key}");
        let value_level = value.map(|v| format!("{key_level}.{}", normalize_value(v)));

        let key_style = self.styles.get(&key_level);
        let value_style = value_level.as_ref().and_then(|k| self.styles.get(k));

        match (key_style, value_style) {
            (None, None) => String::new(),
            (Some(s), None) | (None, Some(s)) => s.clone(),
            (Some(ks), Some(vs)) => {
                match (has_background(ks), has_background(vs)) {
                    (false, true) => join_clauses(ks, vs),
                    (true, false) => join_clauses(vs, ks),
                    _ => {
                        // Both keys exist, so value_level is Some here.
                        let vkey = value_level.as_deref().unwrap_or_default();
                        if self.prefers_key_level(&key_level, vkey) {
                            ks.clone()
                        } else {
                            vs.clone()
                        }
                    }
                }
            }
        }
    }

    /// Resolve and parse into a ratatui Style
    pub fn style(&self, key: &str, value: Option<&str>) -> Style {
        parse_style(&self.resolve(key, value))
    }

    /// Scan the precedence list; the first entry contained in either key decides.
    ///
    /// The key-level name is a prefix of the value-level name, so an entry
    /// matching it also matches the value-level name, which is checked first.
    /// With `resolve`'s candidates the value level therefore always wins; the
    /// scan is kept as written in `rule.precedence.color`'s definition.
    fn prefers_key_level(&self, key_level: &str, value_level: &str) -> bool {
        for entry in &self.precedence {
            if value_level.contains(entry.as_str()) {
                return false;
            }
            if key_level.contains(entry.as_str()) {
                return true;
            }
        }
        false
    }
}

fn normalize_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_")
}

/// A descriptor carries a background clause when it has an `on` token.
fn has_background(descriptor: &str) -> bool {
    descriptor.split_whitespace().any(|t| t.eq_ignore_ascii_case("on"))
}

fn join_clauses(foreground: &str, background: &str) -> String {
    format!("{} {}", foreground.trim(), background.trim())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn resolver(entries: &[(&str, &str)]) -> StyleResolver {
        let config: ConfigMap = entries.iter().copied().collect();
        StyleResolver::new(&config)
    }

    #[test]
    fn test_no_entry_is_empty() {
        let r = resolver(&[("layout.task", "card")]);
        assert_eq!(r.resolve("status", Some("pending")), "");
        assert_eq!(r.style("status", None), Style::default());
    }

    #[test]
    fn test_key_level_only() {
        let r = resolver(&[("color.status", "bold white")]);
        assert_eq!(r.resolve("status", Some("pending")), "bold white");
        assert_eq!(r.resolve("status", None), "bold white");
    }

    #[test]
    fn test_value_level_only() {
        let r = resolver(&[("color.status.pending", "yellow")]);
        assert_eq!(r.resolve("status", Some("pending")), "yellow");
        assert_eq!(r.resolve("status", None), "");
    }

    #[test]
    fn test_value_whitespace_normalized() {
        let r = resolver(&[("color.project.home_chores", "green")]);
        assert_eq!(r.resolve("project", Some("home chores")), "green");
    }

    #[test]
    fn test_foreground_background_merge_order_is_fixed() {
        let r = resolver(&[("color.status", "bold white"), ("color.status.pending", "on blue")]);
        assert_eq!(r.resolve("status", Some("pending")), "bold white on blue");

        let r = resolver(&[("color.status", "on blue"), ("color.status.pending", "bold white")]);
        assert_eq!(r.resolve("status", Some("pending")), "bold white on blue");

        let style = r.style("status", Some("pending"));
        assert_eq!(style.fg, Some(Color::Gray));
        assert_eq!(style.bg, Some(Color::Blue));
    }

    #[test]
    fn test_same_clause_value_level_wins_by_default() {
        let r = resolver(&[("color.status", "white"), ("color.status.pending", "yellow")]);
        assert_eq!(r.resolve("status", Some("pending")), "yellow");

        let r = resolver(&[
            ("color.status", "white on black"),
            ("color.status.pending", "yellow on red"),
        ]);
        assert_eq!(r.resolve("status", Some("pending")), "yellow on red");
    }

    #[test]
    fn test_precedence_value_key_checked_first() {
        // "status" is contained in both keys: the value-level key is checked first.
        let r = resolver(&[
            ("color.status", "white"),
            ("color.status.pending", "yellow"),
            ("rule.precedence.color", "status"),
        ]);
        assert_eq!(r.resolve("status", Some("pending")), "yellow");
    }

    #[test]
    fn test_precedence_entry_matching_nothing_falls_back() {
        let r = resolver(&[
            ("color.status", "white"),
            ("color.status.pending", "yellow"),
            ("rule.precedence.color", "tag.,project."),
        ]);
        assert_eq!(r.resolve("status", Some("pending")), "yellow");
    }

    #[test]
    fn test_precedence_match_on_key_prefix_keeps_value_level() {
        let r = resolver(&[
            ("color.status", "white"),
            ("color.status.pending", "yellow"),
            ("rule.precedence.color", "status"),
        ]);
        assert!(!r.prefers_key_level("color.status", "color.status.pending"));
        assert_eq!(r.resolve("status", Some("pending")), "yellow");
    }
}
