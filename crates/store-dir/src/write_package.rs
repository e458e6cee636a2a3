use crate::{InvalidPackageIdError, StoreDir};
use appmeta_package::PackageEntity;
use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Error type of [`StoreDir::write_package`].
#[derive(Debug, Display, Error, Diagnostic)]
pub enum WritePackageError {
    #[diagnostic(transparent)]
    InvalidId(#[error(source)] InvalidPackageIdError),
    #[display("Failed to create the package directory at {dir:?}: {error}")]
    #[diagnostic(code(appmeta_store_dir::create_dir))]
    CreateDir {
        dir: PathBuf,
        #[error(source)]
        error: io::Error,
    },
    #[display("Failed to serialize the metadata of {id}: {error}")]
    #[diagnostic(code(appmeta_store_dir::serialize))]
    Serialize {
        id: String,
        #[error(source)]
        error: serde_json::Error,
    },
    #[display("Failed to write to file at {file_path:?}: {error}")]
    #[diagnostic(code(appmeta_store_dir::write_file))]
    WriteFile {
        file_path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
}

/// Error type of [`StoreDir::remove_package`].
#[derive(Debug, Display, Error, Diagnostic)]
pub enum RemovePackageError {
    #[diagnostic(transparent)]
    InvalidId(#[error(source)] InvalidPackageIdError),
    #[display("Failed to remove the package directory at {dir:?}: {error}")]
    #[diagnostic(code(appmeta_store_dir::remove_dir))]
    RemoveDir {
        dir: PathBuf,
        #[error(source)]
        error: io::Error,
    },
}

fn write_file(file_path: &Path, content: &[u8]) -> Result<(), WritePackageError> {
    fs::write(file_path, content)
        .map_err(|error| WritePackageError::WriteFile { file_path: file_path.to_path_buf(), error })
}

impl StoreDir {
    /// Persist a package to the store directory.
    ///
    /// * Unless `only_icon` is set, `data.json` is (re)written from the cacheable fields of `package`.
    /// * When `icon_bytes` is provided, `icon.png` is (re)written.
    pub fn write_package(
        &self,
        package: &PackageEntity,
        icon_bytes: Option<&[u8]>,
        only_icon: bool,
    ) -> Result<(), WritePackageError> {
        let dir = self.package_dir(&package.id).map_err(WritePackageError::InvalidId)?;
        fs::create_dir_all(&dir)
            .map_err(|error| WritePackageError::CreateDir { dir: dir.clone(), error })?;

        if !only_icon {
            let content = serde_json::to_vec_pretty(&package.to_cache_entry()).map_err(|error| {
                WritePackageError::Serialize { id: package.id.clone(), error }
            })?;
            write_file(&dir.join("data.json"), &content)?;
        }

        if let Some(icon_bytes) = icon_bytes {
            write_file(&dir.join("icon.png"), icon_bytes)?;
        }

        tracing::debug!(target: "appmeta::store", id = ?package.id, only_icon, "Package persisted");
        Ok(())
    }

    /// Delete everything stored for a package. Returns `false` if nothing was stored.
    pub fn remove_package(&self, id: &str) -> Result<bool, RemovePackageError> {
        let dir = self.package_dir(id).map_err(RemovePackageError::InvalidId)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(RemovePackageError::RemoveDir { dir, error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appmeta_package::CacheEntry;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn package() -> PackageEntity {
        PackageEntity {
            version: Some("2.0".to_string()),
            name: Some("App".to_string()),
            icon_url: Some("https://flathub.org/icon.png".to_string()),
            latest_version: Some("2.0".to_string()),
            installed: true,
            ..PackageEntity::new("org.app")
        }
    }

    #[test]
    fn write_data_without_icon() {
        let dir = tempdir().unwrap();
        let store_dir = StoreDir::new(dir.path());
        store_dir.write_package(&package(), None, false).unwrap();

        let content = fs::read_to_string(store_dir.data_file("org.app").unwrap()).unwrap();
        let entry: CacheEntry = serde_json::from_str(&content).unwrap();
        assert_eq!(entry, package().to_cache_entry());
        assert!(!store_dir.icon_file("org.app").unwrap().exists());
    }

    #[test]
    fn write_only_icon() {
        let dir = tempdir().unwrap();
        let store_dir = StoreDir::new(dir.path());
        store_dir.write_package(&package(), Some(b"\x89PNG"), true).unwrap();

        assert_eq!(fs::read(store_dir.icon_file("org.app").unwrap()).unwrap(), b"\x89PNG");
        assert!(!store_dir.data_file("org.app").unwrap().exists());
    }

    #[test]
    fn overwrite_previous_data() {
        let dir = tempdir().unwrap();
        let store_dir = StoreDir::new(dir.path());
        store_dir.write_package(&package(), None, false).unwrap();

        let updated = PackageEntity { latest_version: Some("3.0".to_string()), ..package() };
        store_dir.write_package(&updated, None, false).unwrap();

        let content = fs::read_to_string(store_dir.data_file("org.app").unwrap()).unwrap();
        assert!(content.contains("3.0"));
    }

    #[test]
    fn remove_package() {
        let dir = tempdir().unwrap();
        let store_dir = StoreDir::new(dir.path());
        store_dir.write_package(&package(), Some(b"icon"), false).unwrap();

        assert!(store_dir.remove_package("org.app").unwrap());
        assert!(!store_dir.package_dir("org.app").unwrap().exists());
        assert!(!store_dir.remove_package("org.app").unwrap());
    }

    #[test]
    fn never_touch_paths_outside_of_store() {
        let root = tempdir().unwrap();
        let store_dir = StoreDir::new(root.path().join("cache"));
        fs::create_dir_all(root.path().join("cache/org.app")).unwrap();
        let victim = root.path().join("victim.txt");
        fs::write(&victim, "keep me").unwrap();
        let elsewhere = tempdir().unwrap();
        let absolute_id = elsewhere.path().join("escaped").to_string_lossy().into_owned();

        for id in ["..", "", "/", "a/b", "org.app/..", absolute_id.as_str()] {
            eprintln!("CASE: {id:?}");
            let error = store_dir.remove_package(id).expect_err("id should be rejected");
            assert!(matches!(error, RemovePackageError::InvalidId(_)));

            let package = PackageEntity { installed: true, ..PackageEntity::new(id) };
            let error = store_dir
                .write_package(&package, Some(b"icon"), false)
                .expect_err("id should be rejected");
            assert!(matches!(error, WritePackageError::InvalidId(_)));
        }

        assert_eq!(fs::read_to_string(&victim).unwrap(), "keep me");
        assert!(root.path().join("cache/org.app").is_dir());
        assert!(!elsewhere.path().join("escaped").exists());
        assert!(!root.path().join("a").exists());
    }
}
