mod fetch_metadata;
mod merge;
mod persist;

pub use fetch_metadata::*;
pub use merge::merge_catalog_app;
pub use persist::*;
