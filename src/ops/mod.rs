pub mod fields;
pub mod group;
pub mod sort;

pub use fields::{FieldError, validate_fields};
pub use group::{Grouping, Groups, SectionOrder};
pub use sort::StackSort;
