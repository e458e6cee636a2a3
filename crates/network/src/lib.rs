use derive_more::{Display, Error};
use miette::Diagnostic;
use pipe_trait::Pipe;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{future::IntoFuture, time::Duration};
use tokio::sync::Semaphore;

/// Error type of [`ThrottledClient::get`].
///
/// Covers everything that prevents a response from being read: connection failures,
/// timeouts, and interrupted bodies.
#[derive(Debug, Display, Error, Diagnostic)]
#[display("Failed to fetch {url}: {error}")]
#[diagnostic(code(appmeta_network::fetch))]
pub struct NetworkError {
    pub url: String,
    #[error(source)]
    pub error: reqwest::Error,
}

impl NetworkError {
    /// Whether the request was aborted because it took longer than its timeout.
    pub fn is_timeout(&self) -> bool {
        self.error.is_timeout()
    }
}

/// Status and body of a completed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub status: u16,
    pub text: String,
}

impl TextResponse {
    /// Whether the server answered with `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Parse the body as JSON.
    pub fn json<Value: DeserializeOwned>(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.text)
    }
}

/// Wrapper around [`Client`] with concurrent request limit enforced by the [`Semaphore`] mechanism.
#[derive(Debug)]
pub struct ThrottledClient {
    semaphore: Semaphore,
    client: Client,
}

impl ThrottledClient {
    /// Acquire a permit and run `proc` with the underlying [`Client`].
    pub async fn run_with_permit<Proc, ProcFuture>(&self, proc: Proc) -> ProcFuture::Output
    where
        Proc: FnOnce(&Client) -> ProcFuture,
        ProcFuture: IntoFuture,
    {
        let permit =
            self.semaphore.acquire().await.expect("semaphore shouldn't have been closed this soon");
        let result = proc(&self.client).await;
        drop(permit);
        result
    }

    /// Send a `GET` request and read the whole body as text.
    ///
    /// `timeout` bounds the entire request, body included. Non-success status codes are
    /// returned as a normal [`TextResponse`]; only transport failures produce an error.
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<TextResponse, NetworkError> {
        let network_error = |error: reqwest::Error| NetworkError { url: url.to_string(), error };
        self.run_with_permit(|client| {
            let request = client.get(url).header("accept", "application/json").timeout(timeout);
            async move {
                let response = request.send().await.map_err(network_error)?;
                let status = response.status().as_u16();
                let text = response.text().await.map_err(network_error)?;
                tracing::debug!(target: "appmeta::network", ?url, status, len = text.len(), "Response received");
                Ok(TextResponse { status, text })
            }
        })
        .await
    }

    /// Construct a new throttled client based on the number of CPUs.
    /// If the number of CPUs is greater than 16, the number of permits will be equal to the number of CPUs.
    /// Otherwise, the number of permits will be 16.
    pub fn new_from_cpu_count() -> Self {
        const MIN_PERMITS: usize = 16;
        let semaphore = num_cpus::get().max(MIN_PERMITS).pipe(Semaphore::new);
        let client = Client::new();
        ThrottledClient { semaphore, client }
    }
}

/// This is only necessary for tests.
impl Default for ThrottledClient {
    fn default() -> Self {
        ThrottledClient::new_from_cpu_count()
    }
}
