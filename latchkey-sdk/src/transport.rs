//! Transport boundary.
//!
//! One synchronous POST per call: the sealed envelope goes out as JSON, a
//! raw inbound envelope comes back. Retries, pooling, and TLS policy all
//! live here, outside the protocol core.

use async_trait::async_trait;
use latchkey_core::{Error, InboundEnvelope, OutboundEnvelope, Result};
use std::time::Duration;
use url::Url;

/// A single request/response POST of a sealed envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &Url, envelope: &OutboundEnvelope) -> Result<InboundEnvelope>;
}

/// Production transport backed by `reqwest` with the rustls TLS stack.
///
/// Non-2xx statuses and I/O failures surface as [`Error::Transport`]; they
/// are never retried here.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(concat!("latchkey-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| Error::Transport {
                status: None,
                message: format!("failed to build HTTP client: {err}"),
            })?;
        Ok(Self { client, timeout })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &Url, envelope: &OutboundEnvelope) -> Result<InboundEnvelope> {
        let response = self
            .client
            .post(url.clone())
            .timeout(self.timeout)
            .json(envelope)
            .send()
            .await
            .map_err(|err| Error::Transport {
                status: None,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        response
            .json::<InboundEnvelope>()
            .await
            .map_err(|err| Error::Deserialization(err.to_string()))
    }
}
