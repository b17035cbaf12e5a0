pub mod date;
pub mod unicode;
pub mod wrap;
