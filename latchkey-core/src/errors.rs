use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the envelope protocol.
///
/// Every variant is terminal for the call that produced it; nothing here is
/// retried. Transport failures are carried through unchanged so the facade
/// can log the cause before flattening the call to its fail-closed result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error("key material error: {0}")]
    Key(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("deserialization error: {0}")]
    Deserialization(String),
    #[error("cannot coerce {found} payload into {expected}")]
    TypeCoercion {
        expected: &'static str,
        found: &'static str,
    },
    #[error("transport error{}: {message}", .status.map(|s| format!(" (http {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[error("config error: {0}")]
    Config(String),
}
