pub mod cache;
pub mod format;

pub use cache::Cache;
