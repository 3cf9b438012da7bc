//! Settled responses and the results derived from them.

use crate::config::Headers;
use serde::de::DeserializeOwned;

/// A response as delivered by a [`Transport`](crate::transport::Transport).
///
/// Any status code is a successful settlement; only transport-level failures
/// reject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    status: u16,
    url: String,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, url: impl Into<String>, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status,
            url: url.into(),
            headers,
            body,
        }
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Final URL after any redirects the transport followed
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response headers
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw body bytes
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The value a controller exposes after a successful settlement.
///
/// Starts out as the response itself; after-hooks may replace it.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestResult {
    /// The settled response, untransformed
    Response(Response),
    /// A value produced by an after-hook
    Value(serde_json::Value),
}

impl RequestResult {
    /// The response, if no hook replaced it.
    #[must_use]
    pub const fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::Value(_) => None,
        }
    }

    /// The hook-produced value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Response(_) => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<Response> for RequestResult {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<serde_json::Value> for RequestResult {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}
