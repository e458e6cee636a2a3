use std::{env, path::PathBuf, str::FromStr};

use appmeta_catalog::{DEFAULT_API_URL, DEFAULT_WEB_URL};
use appmeta_store_dir::StoreDir;
use serde::{de, Deserialize, Deserializer};

pub fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

pub fn default_web_url() -> String {
    DEFAULT_WEB_URL.to_string()
}

pub fn default_attempts() -> u32 {
    2
}

pub fn default_timeout() -> u64 {
    30
}

pub fn default_retry_delay() -> u64 {
    500
}

pub fn default_cache_expiration() -> u64 {
    3600
}

/// Pick the disk cache location from the environment.
///
/// * `$APPMETA_HOME/cache` if `APPMETA_HOME` is set.
/// * `$XDG_CACHE_HOME/appmeta` if `XDG_CACHE_HOME` is set.
/// * `~/.cache/appmeta` otherwise.
/// * `{tmp}/appmeta` if there is no home directory either.
pub fn cache_dir_from(
    appmeta_home: Option<PathBuf>,
    xdg_cache_home: Option<PathBuf>,
    home_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(appmeta_home) = appmeta_home {
        return appmeta_home.join("cache");
    }

    if let Some(xdg_cache_home) = xdg_cache_home {
        return xdg_cache_home.join("appmeta");
    }

    match home_dir {
        Some(home_dir) => home_dir.join(".cache/appmeta"),
        None => env::temp_dir().join("appmeta"),
    }
}

pub fn default_cache_dir() -> StoreDir {
    let var = |name: &str| env::var_os(name).filter(|value| !value.is_empty()).map(PathBuf::from);
    cache_dir_from(var("APPMETA_HOME"), var("XDG_CACHE_HOME"), home::home_dir()).into()
}

pub fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    u64::from_str(s.trim()).map_err(de::Error::custom)
}

/// Attempt counts must be at least 1.
pub fn deserialize_attempts<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match u32::from_str(s.trim()).map_err(de::Error::custom)? {
        0 => Err(de::Error::custom("attempts must be greater than 0")),
        attempts => Ok(attempts),
    }
}

pub fn deserialize_store_dir<'de, D>(deserializer: D) -> Result<StoreDir, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let path = PathBuf::from_str(&s).map_err(de::Error::custom)?;

    if path.is_absolute() {
        return Ok(path.into());
    }

    Ok(env::current_dir().map_err(de::Error::custom)?.join(path).into())
}

/// This deserializer removes trailing "/" so that paths can be appended with `format!`.
pub fn deserialize_url<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().trim_end_matches('/').to_string())
}
