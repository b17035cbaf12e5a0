pub mod color;
pub mod parse;
pub mod resolver;
pub mod theme;

pub use color::normalize_color;
pub use parse::parse_style;
pub use resolver::StyleResolver;
pub use theme::{ThemeRegistry, UnknownTheme};
