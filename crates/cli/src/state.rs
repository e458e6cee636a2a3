use appmeta_config::Config;
use appmeta_diagnostics::DiagnosticSink;
use appmeta_fetcher::{FetchContext, FetchOptions};
use appmeta_mem_cache::MemCache;
use appmeta_network::ThrottledClient;
use pipe_trait::Pipe;
use std::sync::Arc;

/// Application state when running `appmeta fetch`.
pub struct State {
    /// Configuration read from `.appmetarc`
    pub config: &'static Config,
    /// HTTP client to make HTTP requests.
    pub http_client: Arc<ThrottledClient>,
    /// Shared cache of fetched catalog metadata.
    pub api_cache: Arc<MemCache>,
}

impl State {
    /// Initialize the application state.
    pub fn init(config: &'static Config) -> Self {
        State {
            config,
            http_client: ThrottledClient::new_from_cpu_count().pipe(Arc::new),
            api_cache: create_api_cache(config).pipe(Arc::new),
        }
    }

    /// Collaborators shared by every fetch task of this process.
    pub fn fetch_context(&self, reporter: Arc<dyn DiagnosticSink>) -> FetchContext {
        FetchContext {
            http_client: Arc::clone(&self.http_client),
            catalog: self.config.catalog(),
            api_cache: Arc::clone(&self.api_cache),
            persistence: self.config.cache_dir.clone().pipe(Arc::new),
            reporter,
            options: FetchOptions::from_config(self.config),
        }
    }
}

fn create_api_cache(config: &Config) -> MemCache {
    match config.cache_expiration() {
        Some(expiration) => MemCache::with_expiration(expiration),
        None => MemCache::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn context_follows_config() {
        let config: &'static Config =
            Config { attempts: 5, timeout: 7, retry_delay: 0, ..Config::new() }.leak();
        let state = State::init(config);
        let context = state.fetch_context(Arc::new(appmeta_diagnostics::NullSink));

        assert_eq!(context.options.attempts, 5);
        assert_eq!(context.options.timeout, Duration::from_secs(7));
        assert_eq!(context.options.retry_delay, Duration::ZERO);
        assert_eq!(context.catalog, config.catalog());
        assert!(Arc::ptr_eq(&context.api_cache, &state.api_cache));
    }
}
