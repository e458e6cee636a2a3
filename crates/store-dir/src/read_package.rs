use crate::{InvalidPackageIdError, StoreDir};
use appmeta_package::CacheEntry;
use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{fs, io, path::PathBuf};

/// Error type of [`StoreDir::read_package`].
#[derive(Debug, Display, Error, Diagnostic)]
pub enum ReadPackageError {
    #[diagnostic(transparent)]
    InvalidId(#[error(source)] InvalidPackageIdError),
    #[display("Failed to read file at {file_path:?}: {error}")]
    #[diagnostic(code(appmeta_store_dir::read_file))]
    ReadFile {
        file_path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
    #[display("Failed to parse {file_path:?} as cached metadata: {error}")]
    #[diagnostic(
        code(appmeta_store_dir::parse_file),
        help("Delete the file to have it written again on the next fetch.")
    )]
    ParseFile {
        file_path: PathBuf,
        #[error(source)]
        error: serde_json::Error,
    },
}

impl StoreDir {
    /// Read the cached metadata of a package, if any.
    pub fn read_package(&self, id: &str) -> Result<Option<CacheEntry>, ReadPackageError> {
        let file_path = self.data_file(id).map_err(ReadPackageError::InvalidId)?;
        let content = match fs::read_to_string(&file_path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(ReadPackageError::ReadFile { file_path, error }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|error| ReadPackageError::ParseFile { file_path, error })
    }

    /// Ids of every package that has cached metadata, sorted.
    pub fn list_packages(&self) -> Result<Vec<String>, ReadPackageError> {
        let entries = match fs::read_dir(self.root()) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(ReadPackageError::ReadFile { file_path: self.root().to_path_buf(), error })
            }
        };
        let mut ids = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|id| self.data_file(id).is_ok_and(|file| file.is_file()))
            .collect::<Vec<_>>();
        ids.sort();
        Ok(ids)
    }
}
