//! Common types for the Box session workspace

mod error;
mod secret;
mod secrets;

pub use error::{Error, Result};
pub use secret::Secret;
pub use secrets::SecretStore;
