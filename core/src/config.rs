//! Request configuration.
//!
//! [`RequestConfig`] is the single source of truth a controller builds its
//! request descriptors from. It can be assembled with [`RequestConfig::builder`]
//! or deserialized from JSON:
//!
//! ```
//! use netrequest_core::config::{Method, RequestConfig};
//! use std::time::Duration;
//!
//! let config = RequestConfig::from_json(
//!     r#"{ "method": "POST", "mode": "cors", "url": "/orders", "timeOut": 1500 }"#,
//! ).unwrap();
//!
//! assert_eq!(config.method, Method::Post);
//! assert_eq!(config.time_out, Duration::from_millis(1500));
//! assert!(!config.cacheable);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Request headers, keyed by header name.
pub type Headers = BTreeMap<String, String>;

/// Error returned when a configuration document cannot be parsed.
#[derive(Error, Debug)]
#[error("Invalid request configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

/// HTTP method of a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// The method as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-origin mode of a request.
///
/// Carried on the descriptor for transports that enforce origin policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// `cors`
    #[default]
    Cors,
    /// `same-origin`
    SameOrigin,
    /// `navigate`
    Navigate,
    /// `no-cors`
    NoCors,
}

impl Mode {
    /// The mode's canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cors => "cors",
            Self::SameOrigin => "same-origin",
            Self::Navigate => "navigate",
            Self::NoCors => "no-cors",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable request settings.
///
/// `cacheable` defaults to `false` and `time_out` to [`Duration::ZERO`],
/// which disables the timeout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Cross-origin mode
    #[serde(default)]
    pub mode: Mode,
    /// Target URL
    pub url: String,
    /// Request headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    ///
    /// Read from JSON as a string or an array of bytes. UTF-8 bodies are
    /// written back as a string.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "body")]
    pub body: Option<Vec<u8>>,
    /// Store successful responses in the cache store
    #[serde(default)]
    pub cacheable: bool,
    /// Abort the request if it has not settled after this long
    #[serde(default, with = "duration_millis")]
    pub time_out: Duration,
}

impl RequestConfig {
    /// Start building a configuration for `url`.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> RequestConfigBuilder {
        RequestConfigBuilder {
            config: Self {
                url: url.into(),
                ..Self::default()
            },
        }
    }

    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether a timeout is configured.
    #[must_use]
    pub const fn has_time_out(&self) -> bool {
        !self.time_out.is_zero()
    }

    /// Apply a single option to this configuration.
    pub fn apply(&mut self, option: RequestOption) {
        match option {
            RequestOption::Method(method) => self.method = method,
            RequestOption::Mode(mode) => self.mode = mode,
            RequestOption::Url(url) => self.url = url,
            RequestOption::Headers(headers) => self.headers = headers,
            RequestOption::Body(body) => self.body = body,
            RequestOption::Cacheable(cacheable) => self.cacheable = cacheable,
            RequestOption::TimeOut(time_out) => self.time_out = time_out,
        }
    }

    /// Read a single option from this configuration.
    #[must_use]
    pub fn get(&self, key: OptionKey) -> RequestOption {
        match key {
            OptionKey::Method => RequestOption::Method(self.method),
            OptionKey::Mode => RequestOption::Mode(self.mode),
            OptionKey::Url => RequestOption::Url(self.url.clone()),
            OptionKey::Headers => RequestOption::Headers(self.headers.clone()),
            OptionKey::Body => RequestOption::Body(self.body.clone()),
            OptionKey::Cacheable => RequestOption::Cacheable(self.cacheable),
            OptionKey::TimeOut => RequestOption::TimeOut(self.time_out),
        }
    }
}

/// Builder for [`RequestConfig`].
#[derive(Debug, Clone)]
pub struct RequestConfigBuilder {
    config: RequestConfig,
}

impl RequestConfigBuilder {
    /// Set the HTTP method.
    #[must_use]
    pub const fn method(mut self, method: Method) -> Self {
        self.config.method = method;
        self
    }

    /// Set the cross-origin mode.
    #[must_use]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.config.body = Some(body.into());
        self
    }

    /// Enable or disable response caching.
    #[must_use]
    pub const fn cacheable(mut self, cacheable: bool) -> Self {
        self.config.cacheable = cacheable;
        self
    }

    /// Set the timeout. [`Duration::ZERO`] disables it.
    #[must_use]
    pub const fn time_out(mut self, time_out: Duration) -> Self {
        self.config.time_out = time_out;
        self
    }

    /// Build the [`RequestConfig`].
    #[must_use]
    pub fn build(self) -> RequestConfig {
        self.config
    }
}

/// Name of a single configuration field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// [`RequestConfig::method`]
    Method,
    /// [`RequestConfig::mode`]
    Mode,
    /// [`RequestConfig::url`]
    Url,
    /// [`RequestConfig::headers`]
    Headers,
    /// [`RequestConfig::body`]
    Body,
    /// [`RequestConfig::cacheable`]
    Cacheable,
    /// [`RequestConfig::time_out`]
    TimeOut,
}

/// A single configuration field together with its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOption {
    /// HTTP method
    Method(Method),
    /// Cross-origin mode
    Mode(Mode),
    /// Target URL
    Url(String),
    /// Request headers
    Headers(Headers),
    /// Request body
    Body(Option<Vec<u8>>),
    /// Response caching flag
    Cacheable(bool),
    /// Timeout, zero disables
    TimeOut(Duration),
}

impl RequestOption {
    /// The field this option sets.
    #[must_use]
    pub const fn key(&self) -> OptionKey {
        match self {
            Self::Method(_) => OptionKey::Method,
            Self::Mode(_) => OptionKey::Mode,
            Self::Url(_) => OptionKey::Url,
            Self::Headers(_) => OptionKey::Headers,
            Self::Body(_) => OptionKey::Body,
            Self::Cacheable(_) => OptionKey::Cacheable,
            Self::TimeOut(_) => OptionKey::TimeOut,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)] // timeouts never approach u64::MAX ms
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod body {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Bytes(Vec<u8>),
    }

    #[allow(clippy::ref_option)] // signature fixed by serde's `with`
    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value.as_deref().map(std::str::from_utf8) {
            None => serializer.serialize_none(),
            Some(Ok(text)) => serializer.serialize_str(text),
            Some(Err(_)) => serializer.collect_seq(value.iter().flatten()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Ok(Option::<Wire>::deserialize(deserializer)?.map(|wire| match wire {
            Wire::Text(text) => text.into_bytes(),
            Wire::Bytes(bytes) => bytes,
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_normalized_when_fields_are_missing() {
        let config = RequestConfig::from_json(r#"{ "url": "/a" }"#).unwrap();

        assert_eq!(config.method, Method::Get);
        assert_eq!(config.mode, Mode::Cors);
        assert!(!config.cacheable);
        assert_eq!(config.time_out, Duration::ZERO);
        assert!(!config.has_time_out());
        assert!(config.body.is_none());
    }

    #[test]
    fn wire_names_match_fetch_vocabulary() {
        let config = RequestConfig::from_json(
            r#"{ "method": "POST", "mode": "same-origin", "url": "/b", "cacheable": true, "timeOut": 250 }"#,
        )
        .unwrap();

        assert_eq!(config.method, Method::Post);
        assert_eq!(config.mode, Mode::SameOrigin);
        assert!(config.cacheable);
        assert_eq!(config.time_out, Duration::from_millis(250));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["mode"], "same-origin");
        assert_eq!(json["timeOut"], 250);
    }

    #[test]
    fn text_body_reads_and_writes_as_string() {
        let config =
            RequestConfig::from_json(r#"{ "method": "POST", "url": "/a", "body": "hello" }"#).unwrap();
        assert_eq!(config.body.as_deref(), Some(b"hello".as_slice()));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["body"], "hello");
        assert_eq!(RequestConfig::from_json(&json.to_string()).unwrap(), config);
    }

    #[test]
    fn binary_body_survives_as_byte_array() {
        let config = RequestConfig::from_json(r#"{ "url": "/a", "body": [0, 159, 146, 150] }"#).unwrap();
        assert_eq!(config.body.as_deref(), Some([0u8, 159, 146, 150].as_slice()));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["body"], serde_json::json!([0, 159, 146, 150]));
    }

    #[test]
    fn null_body_is_no_body() {
        let config = RequestConfig::from_json(r#"{ "url": "/a", "body": null }"#).unwrap();
        assert!(config.body.is_none());
    }

    #[test]
    fn rejects_unknown_method() {
        let err = RequestConfig::from_json(r#"{ "method": "DELETE", "url": "/c" }"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid request configuration"));
    }

    #[test]
    fn builder_sets_every_field() {
        let config = RequestConfig::builder("/d")
            .method(Method::Post)
            .mode(Mode::NoCors)
            .header("accept", "application/json")
            .body("payload")
            .cacheable(true)
            .time_out(Duration::from_secs(2))
            .build();

        assert_eq!(config.url, "/d");
        assert_eq!(config.method, Method::Post);
        assert_eq!(config.mode, Mode::NoCors);
        assert_eq!(config.headers.get("accept").map(String::as_str), Some("application/json"));
        assert_eq!(config.body.as_deref(), Some(b"payload".as_slice()));
        assert!(config.cacheable);
        assert_eq!(config.time_out, Duration::from_secs(2));
    }

    fn option_strategy() -> impl Strategy<Value = RequestOption> {
        prop_oneof![
            prop_oneof![Just(Method::Get), Just(Method::Post)].prop_map(RequestOption::Method),
            prop_oneof![
                Just(Mode::Cors),
                Just(Mode::SameOrigin),
                Just(Mode::Navigate),
                Just(Mode::NoCors)
            ]
            .prop_map(RequestOption::Mode),
            "[a-z/]{0,12}".prop_map(RequestOption::Url),
            proptest::collection::btree_map("[a-z-]{1,8}", "[a-z0-9]{0,8}", 0..4)
                .prop_map(RequestOption::Headers),
            proptest::option::of(proptest::collection::vec(any::<u8>(), 0..16))
                .prop_map(RequestOption::Body),
            any::<bool>().prop_map(RequestOption::Cacheable),
            (0u64..10_000).prop_map(|ms| RequestOption::TimeOut(Duration::from_millis(ms))),
        ]
    }

    proptest! {
        #[test]
        fn get_returns_most_recently_applied_value(
            options in proptest::collection::vec(option_strategy(), 1..32)
        ) {
            let mut config = RequestConfig::builder("/").build();
            let mut latest = std::collections::HashMap::new();

            for option in options {
                latest.insert(option.key(), option.clone());
                config.apply(option);
            }

            for (key, expected) in latest {
                prop_assert_eq!(config.get(key), expected);
            }
        }
    }
}
