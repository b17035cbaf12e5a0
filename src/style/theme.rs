use indexmap::IndexMap;

use crate::model::ConfigMap;

/// Error raised when a theme name is not registered
#[derive(Debug, thiserror::Error)]
#[error("unknown theme '{name}' (available: {available})")]
pub struct UnknownTheme {
    pub name: String,
    pub available: String,
}

/// Built-in color themes, keyed by name. Each theme is a set of `color.*`
/// entries used to seed the configuration cascade.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: IndexMap<String, ConfigMap>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let mut themes = IndexMap::new();
        themes.insert("none".to_string(), ConfigMap::new());

        let nojhan: ConfigMap = [
            ("color.touched", "#4E9A06"),
            ("color.id", "bold color(214)"),
            ("color.title", "bold white"),
            ("color.description", "default"),
            ("color.modified", "color(240)"),
            ("color.status", "bold italic white"),
            ("color.tags", "color(33)"),
            ("color.urgency", "color(219)"),
            ("color.row.odd", "on #262121"),
            ("color.row.even", "on #2d2929"),
        ]
        .into_iter()
        .collect();
        themes.insert("nojhan".to_string(), nojhan);

        ThemeRegistry { themes }
    }
}

impl ThemeRegistry {
    pub fn get(&self, name: &str) -> Result<&ConfigMap, UnknownTheme> {
        self.themes.get(name).ok_or_else(|| UnknownTheme {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}
