//! # netrequest reqwest transport
//!
//! [`ReqwestTransport`] is the production [`Transport`]: it turns a request
//! descriptor into a `reqwest` request, races it against the descriptor's
//! abort signal and reads the whole body.
//!
//! Every HTTP status is a successful settlement. Only connection failures,
//! invalid requests, unreadable bodies and aborts reject.
//!
//! ## Example
//!
//! ```ignore
//! use netrequest_reqwest::ReqwestTransport;
//! use netrequest_runtime::{ControllerEnvironment, RequestController};
//!
//! let transport = ReqwestTransport::new().with_base_url("https://api.example.com")?;
//! let controller = RequestController::new(
//!     RequestConfig::builder("/orders").build(),
//!     ControllerEnvironment::new(Arc::new(transport)),
//! )?;
//! ```

use netrequest_core::transport::TransportFuture;
use netrequest_core::{AbortSignal, Headers, Method, RequestDescriptor, Response, Transport, TransportError};
use reqwest::{Client, Url};

/// [`Transport`] backed by a `reqwest` [`Client`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Option<Url>,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a transport around an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Resolve relative descriptor URLs against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] if `base` is not an absolute URL.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, TransportError> {
        let base = Url::parse(base).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        self.base_url = Some(base);
        Ok(self)
    }

    fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| TransportError::InvalidRequest(format!("{url}: {e}")))
    }

    fn build(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Request, TransportError> {
        let method = match descriptor.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, self.resolve(descriptor.url())?);
        for (name, value) in descriptor.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = descriptor.body() {
            builder = builder.body(body.to_vec());
        }

        builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }

    async fn fetch(&self, request: reqwest::Request) -> Result<Response, TransportError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(Response::new(status, url, headers, body.to_vec()))
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, descriptor: RequestDescriptor, signal: AbortSignal) -> TransportFuture<'_> {
        Box::pin(async move {
            if signal.is_aborted() {
                return Err(TransportError::Aborted);
            }

            let request = self.build(&descriptor)?;
            tracing::trace!(
                method = %descriptor.method(),
                url = %request.url(),
                mode = %descriptor.mode(),
                "Executing request"
            );

            tokio::select! {
                biased;
                () = signal.aborted() => Err(TransportError::Aborted),
                outcome = self.fetch(request) => outcome,
            }
        })
    }
}
