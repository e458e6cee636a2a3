use crate::CacheEntry;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Loading state of a [`PackageEntity`].
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageStatus {
    /// Catalog data has not been requested yet.
    #[default]
    #[display("unloaded")]
    Unloaded,
    /// A fetch is in progress.
    #[display("loading")]
    Loading,
    /// No fetch is in progress. The data may still be stale if the last fetch failed.
    #[display("ready")]
    Ready,
}

/// What kind of flatpak ref the package is.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    #[default]
    #[display("app")]
    Application,
    #[display("runtime")]
    Runtime,
}

/// In-memory record of a single package.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntity {
    pub id: String,
    pub version: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub latest_version: Option<String>,
    pub status: PackageStatus,
    pub kind: PackageKind,
    pub installed: bool,
}

/// Handle to a [`PackageEntity`] that is owned by the caller and updated by background tasks.
pub type SharedPackage = Arc<RwLock<PackageEntity>>;

/// Whether an optional text field has no usable value.
pub fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().unwrap_or_default().is_empty()
}

impl PackageEntity {
    /// Create an unloaded entity that only knows its id.
    pub fn new(id: impl Into<String>) -> Self {
        PackageEntity { id: id.into(), ..Default::default() }
    }

    /// Wrap the entity into a [`SharedPackage`].
    pub fn into_shared(self) -> SharedPackage {
        Arc::new(RwLock::new(self))
    }

    /// Only installed applications are worth persisting to the disk cache.
    pub fn supports_disk_cache(&self) -> bool {
        self.installed && self.kind == PackageKind::Application
    }

    /// Snapshot of the fields that should be cached.
    pub fn to_cache_entry(&self) -> CacheEntry {
        CacheEntry {
            version: self.version.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon_url: self.icon_url.clone(),
            latest_version: self.latest_version.clone(),
        }
    }

    /// Fill the blank fields from a previously cached snapshot.
    ///
    /// Fields that already have a value are kept. The entity becomes [`PackageStatus::Ready`].
    pub fn fill_from_cache(&mut self, entry: &CacheEntry) {
        fn fill(field: &mut Option<String>, cached: &Option<String>) {
            if is_blank(field) && !is_blank(cached) {
                field.clone_from(cached);
            }
        }

        fill(&mut self.version, &entry.version);
        fill(&mut self.name, &entry.name);
        fill(&mut self.description, &entry.description);
        fill(&mut self.icon_url, &entry.icon_url);
        fill(&mut self.latest_version, &entry.latest_version);
        self.status = PackageStatus::Ready;
    }
}
