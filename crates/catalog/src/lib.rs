mod app;
mod catalog;

pub use app::CatalogApp;
pub use catalog::{Catalog, DEFAULT_API_URL, DEFAULT_WEB_URL};
