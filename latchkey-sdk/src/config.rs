//! Client configuration.
//!
//! Everything a client needs is captured in one immutable struct handed to
//! the constructor; there is no global state and nothing is reloaded after
//! construction.

use crate::client::Operation;
use latchkey_core::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

fn default_timeout_secs() -> u64 {
    30
}

/// Immutable configuration for a [`crate::ProvisioningClient`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the provisioning service; operation suffixes are joined
    /// onto it.
    pub provisioning_url: String,
    /// Shared API key sent in plaintext alongside each encrypted payload.
    pub api_key: String,
    /// SPKI public key file (PEM or bare base64 DER).
    pub public_key_file: PathBuf,
    /// PKCS#8 private key file (PEM or bare base64 DER).
    pub private_key_file: PathBuf,
    /// Per-request timeout, owned by the transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::Config(err.to_string()))
    }

    /// Full endpoint URL for one operation.
    pub fn endpoint(&self, op: Operation) -> Result<Url> {
        let mut base = self.provisioning_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let joined = Url::parse(&base)
            .and_then(|url| url.join(op.path()))
            .map_err(|err| Error::Config(format!("invalid provisioning url: {err}")))?;
        Ok(joined)
    }
}
