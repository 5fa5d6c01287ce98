//! Envelope protocol core for the Latchkey provisioning API.
//!
//! Every application payload is serialized to JSON, encrypted with the
//! caller's registered RSA key pair, and wrapped in a generic request
//! alongside a shared API key. Replies arrive in the mirror shape: an
//! opaque envelope whose payload must be decrypted before any business
//! logic can read it. Plaintext never crosses the transport boundary.
//!
//! This crate owns the cipher, the envelope build/parse steps, and the
//! coercion of decrypted payloads into caller-requested shapes. It performs
//! no network I/O.

pub mod cipher;
pub mod envelope;
pub mod errors;
pub mod keys;

pub use cipher::RsaCipher;
pub use envelope::{
    open, open_as, seal, succeeded, InboundEnvelope, OutboundEnvelope, TargetShape, SUCCEEDED,
};
pub use errors::{Error, Result};
pub use keys::KeyPair;
