pub mod console;
pub mod fragment;
pub mod sectioner;
pub mod stacker;
pub mod tasker;

#[cfg(test)]
pub mod test_helpers;

use crate::model::TouchedSet;
use crate::style::StyleResolver;

pub use fragment::{Fragment, Panel};
pub use sectioner::{Body, SectionLayout, Sectioner};
pub use stacker::{StackLayout, Stacker};
pub use tasker::{ListEnds, Projection, Tasker};

/// Everything a widget reads besides the tasks themselves
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub styles: &'a StyleResolver,
    pub touched: &'a TouchedSet,
    /// strftime pattern for date fields
    pub date_format: &'a str,
}
