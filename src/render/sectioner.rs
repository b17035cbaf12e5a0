use ratatui::text::{Line, Span};

use crate::model::TaskRecord;
use crate::ops::{Grouping, SectionOrder};

use super::{Fragment, RenderContext, Stacker};

/// Title of the section holding tasks that lack the grouping field
pub const EMPTY_KEY_TITLE: &str = "NONE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionLayout {
    /// Fitted section frames top to bottom
    Vertical,
    /// Section frames side by side, sharing the width equally
    #[default]
    Horizontal,
}

/// What each section renders its bucket with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Stack(Stacker),
    /// One nested level of sections
    Sections(Box<Sectioner>),
}

impl Body {
    pub fn render(&self, tasks: &[&TaskRecord], ctx: &RenderContext<'_>) -> Fragment {
        match self {
            Body::Stack(stacker) => stacker.render(tasks, ctx),
            Body::Sections(sectioner) => sectioner.render(tasks, ctx),
        }
    }
}

impl From<Stacker> for Body {
    fn from(stacker: Stacker) -> Self {
        Body::Stack(stacker)
    }
}

impl From<Sectioner> for Body {
    fn from(sectioner: Sectioner) -> Self {
        Body::Sections(Box::new(sectioner))
    }
}

/// Groups tasks, orders the groups and frames each group's rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sectioner {
    pub layout: SectionLayout,
    pub grouping: Grouping,
    pub order: SectionOrder,
    pub body: Body,
}

impl Sectioner {
    pub fn new(
        layout: SectionLayout,
        grouping: Grouping,
        order: SectionOrder,
        body: impl Into<Body>,
    ) -> Self {
        Sectioner {
            layout,
            grouping,
            order,
            body: body.into(),
        }
    }

    /// One titled frame per ordered key present in the partition.
    pub fn render(&self, tasks: &[&TaskRecord], ctx: &RenderContext<'_>) -> Fragment {
        let groups = self.grouping.group(tasks);
        let expand = self.layout == SectionLayout::Horizontal;
        let sections: Vec<Fragment> = self
            .order
            .keys(&groups)
            .into_iter()
            .map(|key| {
                let body = self.body.render(&groups[key], ctx);
                let style = ctx.styles.style(self.grouping.field(), Some(key));
                let title = Line::from(Span::styled(section_title(key), style));
                Fragment::panel(title, body).expand(expand).into()
            })
            .collect();

        match self.layout {
            SectionLayout::Vertical => Fragment::Column(sections),
            SectionLayout::Horizontal => Fragment::Row(sections),
        }
    }
}

pub fn section_title(key: &str) -> String {
    if key.is_empty() {
        EMPTY_KEY_TITLE.to_string()
    } else {
        key.to_uppercase()
    }
}
