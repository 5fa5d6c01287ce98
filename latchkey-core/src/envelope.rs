//! Generic request/response envelopes.
//!
//! The outbound envelope carries the shared API key in plaintext next to
//! the encrypted payload; the inbound envelope carries only an encrypted
//! payload, or none at all. Success or failure of the remote operation is
//! encoded inside the decrypted payload, never at the envelope layer.

use crate::cipher::RsaCipher;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known boolean key inside a mapping reply that signals whether the
/// requested operation succeeded.
pub const SUCCEEDED: &str = "Succeeded";

/// A sealed request ready for transport. Built fresh per call, never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEnvelope {
    #[serde(rename = "Key")]
    pub api_key: String,
    #[serde(rename = "Value")]
    pub payload: String,
}

/// A raw reply as received from the transport. The payload, when present,
/// is still encrypted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "Value")]
    pub payload: Option<String>,
}

/// Serialize `payload` to canonical JSON, encrypt it, and package it with
/// the shared API key.
pub fn seal<P>(payload: &P, api_key: &str, cipher: &RsaCipher) -> Result<OutboundEnvelope>
where
    P: Serialize + ?Sized,
{
    let plain = serde_json::to_string(payload)
        .map_err(|err| Error::Serialization(err.to_string()))?;
    Ok(OutboundEnvelope {
        api_key: api_key.to_string(),
        payload: cipher.encrypt(&plain)?,
    })
}

/// Decrypt a reply's payload and parse it into canonical JSON.
///
/// A reply with no payload is not an error: it observes as `Ok(None)` and
/// callers treat it as "no result". Everything else fails loudly.
pub fn open(reply: &InboundEnvelope, cipher: &RsaCipher) -> Result<Option<Value>> {
    let Some(payload) = reply.payload.as_deref() else {
        return Ok(None);
    };
    let plain = cipher.decrypt(payload)?;
    let value = serde_json::from_str(&plain)
        .map_err(|err| Error::Deserialization(err.to_string()))?;
    Ok(Some(value))
}

/// [`open`], then coerce the decrypted payload into the requested shape.
pub fn open_as<T: TargetShape>(reply: &InboundEnvelope, cipher: &RsaCipher) -> Result<Option<T>> {
    match open(reply, cipher)? {
        Some(value) => Ok(Some(T::from_value(value)?)),
        None => Ok(None),
    }
}

/// A result shape a caller may request from a decrypted payload.
///
/// The protocol allows the payload root to be a bare scalar as well as a
/// mapping, so coercion is explicit here rather than an unchecked cast at
/// the call site. A mismatch is a [`Error::TypeCoercion`], never a default.
pub trait TargetShape: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

impl TargetShape for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl TargetShape for Map<String, Value> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::TypeCoercion {
                expected: "mapping",
                found: kind(&other),
            }),
        }
    }
}

impl TargetShape for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(text),
            other => Err(Error::TypeCoercion {
                expected: "string",
                found: kind(&other),
            }),
        }
    }
}

impl TargetShape for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => Err(Error::TypeCoercion {
                expected: "boolean",
                found: kind(&other),
            }),
        }
    }
}

/// Read the [`SUCCEEDED`] flag out of a mapping reply.
pub fn succeeded(reply: &Map<String, Value>) -> Result<bool> {
    match reply.get(SUCCEEDED) {
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(Error::TypeCoercion {
            expected: "boolean",
            found: kind(other),
        }),
        None => Err(Error::TypeCoercion {
            expected: "boolean",
            found: "absent",
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use serde_json::json;
    use std::sync::OnceLock;

    fn cipher() -> &'static RsaCipher {
        static CIPHER: OnceLock<RsaCipher> = OnceLock::new();
        CIPHER.get_or_init(|| {
            let mut rng = rand::thread_rng();
            let private = RsaPrivateKey::new(&mut rng, 2048).unwrap();
            let public = RsaPublicKey::from(&private);
            RsaCipher::new(KeyPair::new(public, private))
        })
    }

    fn reply_with(value: &Value) -> InboundEnvelope {
        InboundEnvelope {
            payload: Some(cipher().encrypt(&value.to_string()).unwrap()),
        }
    }

    #[test]
    fn seal_keeps_api_key_plaintext_and_payload_encrypted() {
        let payload = json!({"Email": "user@test.com"});
        let envelope = seal(&payload, "K", cipher()).unwrap();
        assert_eq!(envelope.api_key, "K");
        assert!(!envelope.payload.contains("user@test.com"));
        assert_eq!(
            cipher().decrypt(&envelope.payload).unwrap(),
            payload.to_string()
        );
    }

    #[test]
    fn seal_accepts_a_bare_string_payload() {
        let envelope = seal("user@test.com", "K", cipher()).unwrap();
        assert_eq!(
            cipher().decrypt(&envelope.payload).unwrap(),
            "\"user@test.com\""
        );
    }

    #[test]
    fn open_returns_none_on_missing_payload() {
        let reply = InboundEnvelope { payload: None };
        assert_eq!(open(&reply, cipher()).unwrap(), None);
        assert!(open_as::<String>(&reply, cipher()).unwrap().is_none());
    }

    #[test]
    fn open_round_trips_a_mapping_payload() {
        let reply = reply_with(&json!({"Succeeded": true, "Users": ["a@test.com"]}));
        let map: Map<String, Value> = open_as(&reply, cipher()).unwrap().unwrap();
        assert_eq!(succeeded(&map).unwrap(), true);
        assert_eq!(map["Users"], json!(["a@test.com"]));
    }

    #[test]
    fn open_coerces_a_bare_string_root() {
        let reply = reply_with(&json!("abc123"));
        let guid: String = open_as(&reply, cipher()).unwrap().unwrap();
        assert_eq!(guid, "abc123");
    }

    #[test]
    fn open_coerces_a_bare_boolean_root() {
        let reply = reply_with(&json!(true));
        assert_eq!(open_as::<bool>(&reply, cipher()).unwrap(), Some(true));
        assert!(open_as::<bool>(&reply_with(&json!("yes")), cipher()).is_err());
    }

    #[test]
    fn string_root_does_not_coerce_into_a_mapping() {
        let reply = reply_with(&json!("abc123"));
        let err = open_as::<Map<String, Value>>(&reply, cipher()).unwrap_err();
        assert_eq!(
            err,
            Error::TypeCoercion {
                expected: "mapping",
                found: "string"
            }
        );
    }

    #[test]
    fn mapping_root_does_not_coerce_into_a_string() {
        let reply = reply_with(&json!({"Succeeded": true}));
        let err = open_as::<String>(&reply, cipher()).unwrap_err();
        assert_eq!(
            err,
            Error::TypeCoercion {
                expected: "string",
                found: "object"
            }
        );
    }

    #[test]
    fn missing_succeeded_flag_is_a_coercion_error() {
        let map = Map::new();
        let err = succeeded(&map).unwrap_err();
        assert_eq!(
            err,
            Error::TypeCoercion {
                expected: "boolean",
                found: "absent"
            }
        );
    }

    #[test]
    fn non_boolean_succeeded_flag_is_a_coercion_error() {
        let mut map = Map::new();
        map.insert(SUCCEEDED.to_string(), json!("yes"));
        assert!(succeeded(&map).is_err());
    }

    #[test]
    fn malformed_decrypted_text_is_a_deserialization_error() {
        let reply = InboundEnvelope {
            payload: Some(cipher().encrypt("{not json").unwrap()),
        };
        let err = open(&reply, cipher()).unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn garbage_payload_is_a_crypto_error() {
        let reply = InboundEnvelope {
            payload: Some("AAAA".to_string()),
        };
        let err = open(&reply, cipher()).unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }
}
