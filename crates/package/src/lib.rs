mod cache_entry;
mod entity;

pub use cache_entry::*;
pub use entity::*;
