mod custom_deserializer;

use appmeta_catalog::Catalog;
use appmeta_store_dir::StoreDir;
use pipe_trait::Pipe;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};

use crate::custom_deserializer::{
    default_api_url, default_attempts, default_cache_dir, default_cache_expiration,
    default_retry_delay, default_timeout, default_web_url, deserialize_attempts,
    deserialize_store_dir, deserialize_u64, deserialize_url,
};

/// Name of the configuration file looked up in the working directory and the home directory.
pub const CONFIG_FILE_NAME: &str = ".appmetarc";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Base URL of the catalog REST API. Metadata of an app is read from `{api-url}/apps/{id}`.
    #[serde(default = "default_api_url", deserialize_with = "deserialize_url")]
    pub api_url: String,

    /// Origin of the catalog website. Root-relative icon paths are resolved against it.
    #[serde(default = "default_web_url", deserialize_with = "deserialize_url")]
    pub web_url: String,

    /// How many times the metadata of a single package is requested before giving up.
    #[serde(default = "default_attempts", deserialize_with = "deserialize_attempts")]
    pub attempts: u32,

    /// Timeout of a single request, in seconds.
    #[serde(default = "default_timeout", deserialize_with = "deserialize_u64")]
    pub timeout: u64,

    /// Pause after a failed connection before the next attempt, in milliseconds.
    ///
    /// There is no pause when the server answers with an error status.
    #[serde(default = "default_retry_delay", deserialize_with = "deserialize_u64")]
    pub retry_delay: u64,

    /// The location where the metadata of installed applications is persisted.
    #[serde(default = "default_cache_dir", deserialize_with = "deserialize_store_dir")]
    pub cache_dir: StoreDir,

    /// Lifetime of an in-memory cache entry, in seconds. `0` keeps entries forever.
    #[serde(default = "default_cache_expiration", deserialize_with = "deserialize_u64")]
    pub cache_expiration: u64,
}

impl Config {
    pub fn new() -> Self {
        Config {
            api_url: default_api_url(),
            web_url: default_web_url(),
            attempts: default_attempts(),
            timeout: default_timeout(),
            retry_delay: default_retry_delay(),
            cache_dir: default_cache_dir(),
            cache_expiration: default_cache_expiration(),
        }
    }

    /// Try loading the config file from the working directory, then from the home directory.
    ///
    /// A missing or unparsable file is skipped. `default` is used when no file could be loaded.
    pub fn current<Error, CurrentDir, HomeDir, Default>(
        current_dir: CurrentDir,
        home_dir: HomeDir,
        default: Default,
    ) -> Self
    where
        CurrentDir: FnOnce() -> Result<PathBuf, Error>,
        HomeDir: FnOnce() -> Option<PathBuf>,
        Default: FnOnce() -> Config,
    {
        let load = |dir: PathBuf| -> Option<Config> {
            let path = dir.join(CONFIG_FILE_NAME);
            let content = fs::read_to_string(&path).ok()?;
            match serde_ini::from_str(&content) {
                Ok(config) => Some(config),
                Err(error) => {
                    tracing::warn!(target: "appmeta::config", ?path, %error, "Ignore invalid config file");
                    None
                }
            }
        };

        current_dir()
            .ok()
            .and_then(load)
            .or_else(|| home_dir().and_then(load))
            .unwrap_or_else(default)
    }

    /// Persist the current config on the heap permanently.
    pub fn leak(self) -> &'static mut Self {
        self.pipe(Box::new).pipe(Box::leak)
    }

    /// Addresses of the configured catalog.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(&self.api_url, &self.web_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    /// `None` when in-memory cache entries never expire.
    pub fn cache_expiration(&self) -> Option<Duration> {
        (self.cache_expiration > 0).then(|| Duration::from_secs(self.cache_expiration))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
