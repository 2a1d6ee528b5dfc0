pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod pivot;
pub mod query;
pub mod time;

pub use error::{CwqError, Result};
