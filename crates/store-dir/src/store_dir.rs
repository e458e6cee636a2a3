use derive_more::{Display, Error, From};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{self, Component, Path, PathBuf};

/// The package id cannot be used as the name of a single directory inside the store.
#[derive(Debug, Display, Error, Diagnostic)]
#[display("Invalid package id {id:?}")]
#[diagnostic(
    code(appmeta_store_dir::invalid_id),
    help("A package id must be a single file name such as `org.gnome.Maps`.")
)]
pub struct InvalidPackageIdError {
    #[error(not(source))]
    pub id: String,
}

/// Check that `id` is exactly one normal path component.
fn validate_id(id: &str) -> Result<&str, InvalidPackageIdError> {
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == id => Ok(id),
        _ => Err(InvalidPackageIdError { id: id.to_string() }),
    }
}

/// Represent a store directory.
///
/// * The store directory keeps the catalog metadata of installed applications between runs.
/// * Every package gets its own sub-directory named after its id, holding `data.json`
///   and optionally `icon.png`.
/// * The location of the store directory can be customized by the `cache-dir` field.
#[derive(Debug, Clone, PartialEq, Eq, From, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StoreDir {
    /// Path to the root of the store directory from which all sub-paths are derived.
    ///
    /// Consumer of this struct should interact with the sub-paths instead of this path.
    root: PathBuf,
}

impl StoreDir {
    /// Construct an instance of [`StoreDir`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        root.into().into()
    }

    /// Create an object that [displays](std::fmt::Display) the root of the store directory.
    pub fn display(&self) -> path::Display {
        self.root.display()
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a single package: `{store}/{id}`.
    ///
    /// Ids that would resolve outside of `{store}` are rejected.
    pub fn package_dir(&self, id: &str) -> Result<PathBuf, InvalidPackageIdError> {
        validate_id(id).map(|id| self.root.join(id))
    }

    /// Path to the cached metadata of a package: `{store}/{id}/data.json`.
    pub fn data_file(&self, id: &str) -> Result<PathBuf, InvalidPackageIdError> {
        self.package_dir(id).map(|dir| dir.join("data.json"))
    }

    /// Path to the cached icon of a package: `{store}/{id}/icon.png`.
    pub fn icon_file(&self, id: &str) -> Result<PathBuf, InvalidPackageIdError> {
        self.package_dir(id).map(|dir| dir.join("icon.png"))
    }
}
