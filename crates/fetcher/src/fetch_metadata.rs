use crate::{merge_catalog_app, PersistPackage};
use appmeta_catalog::{Catalog, CatalogApp};
use appmeta_config::Config;
use appmeta_diagnostics::{DiagnosticSink, Severity};
use appmeta_mem_cache::MemCache;
use appmeta_network::{NetworkError, ThrottledClient};
use appmeta_package::{PackageStatus, SharedPackage};
use derive_more::{Display, Error};
use miette::Diagnostic;
use smart_default::SmartDefault;
use std::{collections::HashMap, mem, sync::Arc, time::Duration};
use tracing::instrument;

/// Retry policy of [`FetchMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault)]
pub struct FetchOptions {
    /// Maximum number of requests per run.
    #[default(2)]
    pub attempts: u32,
    /// Timeout of every single request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
    /// Pause after a transport or parse failure. Error statuses are retried without pause.
    #[default(Duration::from_millis(500))]
    pub retry_delay: Duration,
}

impl FetchOptions {
    pub fn from_config(config: &Config) -> Self {
        FetchOptions {
            attempts: config.attempts,
            timeout: config.timeout(),
            retry_delay: config.retry_delay(),
        }
    }
}

/// Collaborators shared by every [`FetchMetadata`] task of a worklist.
#[derive(Clone)]
pub struct FetchContext {
    /// HTTP client to make HTTP requests.
    pub http_client: Arc<ThrottledClient>,
    /// Where the metadata is requested from.
    pub catalog: Catalog,
    /// Shared cache that stores the fetched metadata.
    pub api_cache: Arc<MemCache>,
    /// Durable storage for installed applications.
    pub persistence: Arc<dyn PersistPackage>,
    /// Destination of failure messages.
    pub reporter: Arc<dyn DiagnosticSink>,
    pub options: FetchOptions,
}

/// Why a single request did not produce usable metadata.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum AttemptError {
    #[display("Could not retrieve app data for id '{id}'. Server response: {status}. Body: {body}")]
    #[diagnostic(code(appmeta_fetcher::remote_unavailable))]
    RemoteUnavailable { id: String, status: u16, body: String },

    #[display("Could not retrieve app data for id '{id}': {error}")]
    #[diagnostic(code(appmeta_fetcher::transport))]
    Transport {
        id: String,
        #[error(source)]
        error: NetworkError,
    },

    #[display("Could not parse app data for id '{id}': {error}")]
    #[diagnostic(code(appmeta_fetcher::parse))]
    Parse {
        id: String,
        #[error(source)]
        error: serde_json::Error,
    },
}

impl AttemptError {
    /// Whether the next attempt should wait for [`FetchOptions::retry_delay`].
    ///
    /// Only failures that never reached a proper answer from the server are delayed.
    pub fn backs_off(&self) -> bool {
        !matches!(self, AttemptError::RemoteUnavailable { .. })
    }

    pub fn severity(&self) -> Severity {
        match self {
            AttemptError::RemoteUnavailable { .. } => Severity::Error,
            AttemptError::Transport { .. } | AttemptError::Parse { .. } => Severity::Warning,
        }
    }
}

/// What happened during [`FetchMetadata::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No package was bound to the task.
    Skipped,
    /// The metadata was merged after the given number of requests.
    Fetched { attempts: u32 },
    /// Every attempt failed. The package kept its previous data.
    Exhausted,
}

/// This subroutine fetches the catalog metadata of a single package.
///
/// Packages that support the disk cache are remembered until [`FetchMetadata::flush`].
pub struct FetchMetadata {
    context: FetchContext,
    package: Option<SharedPackage>,
    to_persist: HashMap<String, SharedPackage>,
}

impl FetchMetadata {
    /// Bind a task to `package`. A task without package does nothing.
    pub fn new(context: FetchContext, package: Option<SharedPackage>) -> Self {
        FetchMetadata { context, package, to_persist: HashMap::new() }
    }

    /// Create a task with the same collaborators for another package.
    ///
    /// The new task starts with nothing to persist.
    pub fn duplicate(&self, package: Option<SharedPackage>) -> Self {
        FetchMetadata::new(self.context.clone(), package)
    }

    pub fn context(&self) -> &FetchContext {
        &self.context
    }

    pub fn package(&self) -> Option<&SharedPackage> {
        self.package.as_ref()
    }

    /// Ids of the packages waiting for [`FetchMetadata::flush`], sorted.
    pub fn pending_ids(&self) -> Vec<String> {
        let mut ids = self.to_persist.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn has_pending(&self) -> bool {
        !self.to_persist.is_empty()
    }

    /// Execute the subroutine.
    ///
    /// Failures are reported and retried, never returned. The package is always
    /// [`PackageStatus::Ready`] afterwards.
    pub async fn run(&mut self) -> FetchOutcome {
        let Some(package) = self.package.clone() else {
            return FetchOutcome::Skipped;
        };

        let id = {
            let mut package = package.write().await;
            package.status = PackageStatus::Loading;
            package.id.clone()
        };

        let FetchOptions { attempts, retry_delay, .. } = self.context.options;
        let mut outcome = FetchOutcome::Exhausted;

        for attempt in 1..=attempts {
            match self.fetch_once(&id).await {
                Ok(app) => {
                    let mut entity = package.write().await;
                    merge_catalog_app(&mut entity, app, &self.context.catalog);
                    self.context.api_cache.add(id.clone(), entity.to_cache_entry());
                    entity.status = PackageStatus::Ready;

                    if entity.supports_disk_cache() {
                        self.to_persist.insert(id.clone(), Arc::clone(&package));
                    }

                    tracing::info!(target: "appmeta::fetch", ?id, attempt, "Metadata fetched");
                    outcome = FetchOutcome::Fetched { attempts: attempt };
                    break;
                }
                Err(error) => {
                    self.context.reporter.report(&error.to_string(), error.severity());
                    if error.backs_off() && attempt < attempts {
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        }

        package.write().await.status = PackageStatus::Ready;
        outcome
    }

    #[instrument(skip(self))]
    async fn fetch_once(&self, id: &str) -> Result<CatalogApp, AttemptError> {
        let url = self.context.catalog.app_url(id);
        let response = self
            .context
            .http_client
            .get(&url, self.context.options.timeout)
            .await
            .map_err(|error| AttemptError::Transport { id: id.to_string(), error })?;

        if !response.is_ok() || response.text.is_empty() {
            return Err(AttemptError::RemoteUnavailable {
                id: id.to_string(),
                status: response.status,
                body: response.text,
            });
        }

        response.json().map_err(|error| AttemptError::Parse { id: id.to_string(), error })
    }

    /// Hand every pending package to the persistence collaborator, then forget them.
    ///
    /// Returns how many packages were handed over. Persistence failures are reported and not
    /// retried.
    pub async fn flush(&mut self) -> usize {
        let to_persist = mem::take(&mut self.to_persist);
        let count = to_persist.len();

        for (id, package) in to_persist {
            let package = package.read().await;
            if let Err(error) = self.context.persistence.cache_to_disk(&package, None, false) {
                let message = format!("Could not persist app data for id '{id}': {error}");
                self.context.reporter.report(&message, Severity::Error);
            }
        }

        count
    }
}
