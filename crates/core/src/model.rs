pub mod metric;
pub mod result;
