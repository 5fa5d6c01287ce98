//! RSA key pair loading.
//!
//! Key files are accepted in PEM or bare base64 DER form. The public key is
//! an X.509 SPKI document, the private key PKCS#8. Both halves are loaded
//! once at client construction and never reloaded.

use crate::errors::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fs;
use std::path::Path;

/// An RSA key pair registered with the provisioning service.
///
/// The service encrypts replies to the same public key the client
/// registered, so the client holds both halves: the public key seals
/// outbound payloads, the private key opens inbound ones.
#[derive(Debug, Clone)]
pub struct KeyPair {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

impl KeyPair {
    /// Wrap an already-parsed key pair.
    pub fn new(public: RsaPublicKey, private: RsaPrivateKey) -> Self {
        Self { public, private }
    }

    /// Load a key pair from an SPKI public key file and a PKCS#8 private
    /// key file.
    pub fn from_files(
        public_key_file: impl AsRef<Path>,
        private_key_file: impl AsRef<Path>,
    ) -> Result<Self> {
        let public = load_public_key(public_key_file.as_ref())?;
        let private = load_private_key(private_key_file.as_ref())?;
        Ok(Self { public, private })
    }

    /// Public half, used for sealing outbound payloads.
    pub fn public(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Private half, used for opening inbound payloads.
    pub fn private(&self) -> &RsaPrivateKey {
        &self.private
    }
}

fn load_public_key(path: &Path) -> Result<RsaPublicKey> {
    let text = read_key_file(path)?;
    if text.contains("-----BEGIN") {
        RsaPublicKey::from_public_key_pem(&text)
            .map_err(|err| key_error(path, "public key PEM", err))
    } else {
        let der = decode_bare_base64(path, &text)?;
        RsaPublicKey::from_public_key_der(&der)
            .map_err(|err| key_error(path, "public key DER", err))
    }
}

fn load_private_key(path: &Path) -> Result<RsaPrivateKey> {
    let text = read_key_file(path)?;
    if text.contains("-----BEGIN") {
        RsaPrivateKey::from_pkcs8_pem(&text)
            .map_err(|err| key_error(path, "PKCS#8 private key PEM", err))
    } else {
        let der = decode_bare_base64(path, &text)?;
        RsaPrivateKey::from_pkcs8_der(&der)
            .map_err(|err| key_error(path, "PKCS#8 private key DER", err))
    }
}

fn read_key_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|err| Error::Key(format!("failed to read {}: {err}", path.display())))
}

fn decode_bare_base64(path: &Path, text: &str) -> Result<Vec<u8>> {
    let compact: String = text.split_whitespace().collect();
    STANDARD
        .decode(compact)
        .map_err(|err| Error::Key(format!("{} is not valid base64: {err}", path.display())))
}

fn key_error(path: &Path, kind: &str, err: impl std::fmt::Display) -> Error {
    Error::Key(format!("{} is not a valid {kind}: {err}", path.display()))
}
