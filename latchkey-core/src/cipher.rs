//! RSA payload cipher.
//!
//! Wire compatibility notes: payload text is converted to bytes as UTF-16LE
//! (not UTF-8) before encryption, and ciphertext travels as standard base64.
//! Both choices must match the counterpart service exactly or round-trips
//! fail on non-ASCII text.

use crate::errors::{Error, Result};
use crate::keys::KeyPair;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::traits::PublicKeyParts;
use rsa::Pkcs1v15Encrypt;

/// PKCS#1 v1.5 reserves eleven bytes of every block for padding.
const PKCS1_PADDING_OVERHEAD: usize = 11;

/// Encrypts outbound payload text with the registered public key and
/// decrypts inbound payload text with the matching private key.
///
/// Holds no mutable state; a single instance may serve concurrent calls.
#[derive(Debug, Clone)]
pub struct RsaCipher {
    keys: KeyPair,
}

impl RsaCipher {
    pub fn new(keys: KeyPair) -> Self {
        Self { keys }
    }

    /// Largest UTF-16LE payload, in bytes, that fits a single block.
    ///
    /// Asymmetric encryption is strictly single-block here; payloads are not
    /// chunked. Anything larger is rejected outright.
    pub fn max_plaintext_bytes(&self) -> usize {
        self.keys.public().size() - PKCS1_PADDING_OVERHEAD
    }

    /// Encrypt payload text into transport-safe base64.
    pub fn encrypt(&self, plain_text: &str) -> Result<String> {
        let bytes = utf16le_bytes(plain_text);
        let ceiling = self.max_plaintext_bytes();
        if bytes.len() > ceiling {
            return Err(Error::Crypto(format!(
                "payload is {} bytes encoded, over the {ceiling}-byte single-block ceiling",
                bytes.len()
            )));
        }

        let mut rng = rand::thread_rng();
        let cipher_bytes = self
            .keys
            .public()
            .encrypt(&mut rng, Pkcs1v15Encrypt, &bytes)
            .map_err(|err| Error::Crypto(format!("encryption failed: {err}")))?;
        Ok(STANDARD.encode(cipher_bytes))
    }

    /// Decrypt transport-safe base64 back into payload text.
    pub fn decrypt(&self, cipher_text: &str) -> Result<String> {
        let cipher_bytes = STANDARD
            .decode(cipher_text.trim())
            .map_err(|err| Error::Crypto(format!("ciphertext is not valid base64: {err}")))?;
        let bytes = self
            .keys
            .private()
            .decrypt(Pkcs1v15Encrypt, &cipher_bytes)
            .map_err(|err| Error::Crypto(format!("decryption failed: {err}")))?;
        utf16le_string(&bytes)
    }
}

fn utf16le_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

fn utf16le_string(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Crypto(
            "decrypted payload has odd length, not UTF-16LE".to_string(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|err| Error::Crypto(format!("decrypted payload is not UTF-16LE: {err}")))
}
