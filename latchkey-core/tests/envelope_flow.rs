//! End-to-end envelope flow against the public API only: seal a request,
//! verify what crosses the wire, then open a crafted reply.

use latchkey_core::{open_as, seal, succeeded, InboundEnvelope, KeyPair, RsaCipher};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{json, Map, Value};

fn cipher() -> RsaCipher {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let public = RsaPublicKey::from(&private);
    RsaCipher::new(KeyPair::new(public, private))
}

#[test]
fn request_reply_cycle() {
    let cipher = cipher();

    // Outbound: API key in plaintext, payload only in encrypted form.
    let envelope = seal(&json!({"Email": "user@test.com"}), "K", &cipher).unwrap();
    assert_eq!(envelope.api_key, "K");
    assert!(!envelope.payload.contains("Email"));
    assert!(!envelope.payload.contains("user@test.com"));

    // The wire form is plain JSON with the service's field names.
    let wire = serde_json::to_value(&envelope).unwrap();
    assert_eq!(wire["Key"], "K");
    assert!(wire["Value"].is_string());

    // Inbound: the service answers with an encrypted `{"Succeeded": true}`.
    let reply = InboundEnvelope {
        payload: Some(cipher.encrypt(&json!({"Succeeded": true}).to_string()).unwrap()),
    };
    let map: Map<String, Value> = open_as(&reply, &cipher).unwrap().unwrap();
    assert!(succeeded(&map).unwrap());
}

#[test]
fn wire_reply_with_null_value_is_no_result() {
    let cipher = cipher();
    let reply: InboundEnvelope = serde_json::from_str(r#"{"Value": null}"#).unwrap();
    assert!(open_as::<Value>(&reply, &cipher).unwrap().is_none());
}
