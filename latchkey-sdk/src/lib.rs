//! Client SDK for the Latchkey provisioning API.
//!
//! [`ProvisioningClient`] wraps every call in the generic encrypted
//! envelope from `latchkey-core`, POSTs it to the operation's endpoint,
//! and coerces the decrypted reply into the caller's result shape.

pub mod client;
pub mod config;
pub mod model;
pub mod transport;

pub use client::{Operation, ProvisioningClient};
pub use config::ClientConfig;
pub use latchkey_core::{Error, Result};
pub use model::User;
pub use transport::{HttpTransport, Transport};
