use appmeta_package::PackageEntity;
use appmeta_store_dir::{StoreDir, WritePackageError};
use derive_more::{Display, Error, From};
use miette::Diagnostic;

/// Error type of [`PersistPackage::cache_to_disk`].
#[derive(Debug, Display, Error, From, Diagnostic)]
#[non_exhaustive]
pub enum PersistError {
    #[diagnostic(transparent)]
    WritePackage(#[error(source)] WritePackageError),
}

/// Durable storage of fetched packages, owned by whoever manages the packages.
pub trait PersistPackage: Send + Sync {
    /// Write `package` to durable storage.
    ///
    /// `icon_bytes` is the raw icon to store alongside, if any. When `only_icon` is set the
    /// metadata itself is left untouched.
    fn cache_to_disk(
        &self,
        package: &PackageEntity,
        icon_bytes: Option<&[u8]>,
        only_icon: bool,
    ) -> Result<(), PersistError>;
}

impl PersistPackage for StoreDir {
    fn cache_to_disk(
        &self,
        package: &PackageEntity,
        icon_bytes: Option<&[u8]>,
        only_icon: bool,
    ) -> Result<(), PersistError> {
        self.write_package(package, icon_bytes, only_icon).map_err(PersistError::WritePackage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn store_dir_persists_metadata() {
        let dir = tempdir().unwrap();
        let store_dir = StoreDir::new(dir.path());
        let package = PackageEntity {
            name: Some("App".to_string()),
            installed: true,
            ..PackageEntity::new("org.app")
        };

        let persistence: &dyn PersistPackage = &store_dir;
        persistence.cache_to_disk(&package, None, false).unwrap();

        assert_eq!(store_dir.read_package("org.app").unwrap(), Some(package.to_cache_entry()));
    }
}
