//! Configuration for the webhook client.
//!
//! Everything that varies between deployments lives in [`ClientConfig`],
//! built via [`ClientConfigBuilder`]. Defaults point at the production
//! webhook and use content-based body encoding.

use crate::error::PostforgeError;
use crate::messages::DEFAULT_ENDPOINT;
use crate::pipeline::encode::BodyEncoding;
use crate::progress::SubmissionObserver;
use std::fmt;
use std::sync::Arc;

/// Configuration for a [`crate::Client`].
///
/// # Example
/// ```rust
/// use postforge::{BodyEncoding, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .endpoint("https://automation.example.com/webhook/content")
///     .body_encoding(BodyEncoding::Multipart)
///     .build()
///     .unwrap();
/// assert!(config.endpoint.ends_with("/content"));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Webhook URL the form posts to.
    pub endpoint: String,

    /// Encoding for requests without a video. Default: [`BodyEncoding::ByContent`].
    pub body_encoding: BodyEncoding,

    /// TCP connect timeout in seconds. Default: none.
    ///
    /// The request itself is never timed out: generating and posting content
    /// can take minutes.
    pub connect_timeout_secs: Option<u64>,

    /// Receives UI state transitions during a submission.
    pub observer: Option<Arc<dyn SubmissionObserver>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            body_encoding: BodyEncoding::default(),
            connect_timeout_secs: None,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("body_encoding", &self.body_encoding)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn SubmissionObserver>"),
            )
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.config.body_encoding = encoding;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = Some(secs.max(1));
        self
    }

    pub fn observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating the endpoint.
    pub fn build(self) -> Result<ClientConfig, PostforgeError> {
        let endpoint = self.config.endpoint.trim();
        let parsed = reqwest::Url::parse(endpoint)
            .map_err(|e| PostforgeError::InvalidConfig(format!("endpoint '{endpoint}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PostforgeError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got scheme '{}'",
                parsed.scheme()
            )));
        }
        let endpoint = endpoint.to_string();
        Ok(ClientConfig {
            endpoint,
            ..self.config
        })
    }
}
