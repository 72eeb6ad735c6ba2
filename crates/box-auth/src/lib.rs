//! Box credential-strategy library
//!
//! Implements the three authorization strategies against the Box API —
//! interactive OAuth 2.0 code exchange, JWT service-account assertion, and
//! a pre-issued developer token — behind a uniform typed result. This crate
//! is a standalone library with no dependency on any UI layer; the session
//! coordinator drives it and a console binary (or any other front end)
//! drives the coordinator.
//!
//! Delegated flow:
//! 1. Caller checks `validator::validate(StrategyKind::DelegatedCode, ..)`
//! 2. `strategy::begin_authorization()` returns the authorize URL + state token
//! 3. User authorizes in a browser and pastes the redirect URL back
//! 4. `strategy::complete_authorization()` verifies the state and exchanges
//!    the code via the `BoxApi` capability
//! 5. Caller fetches the identity through a `ClientHandle` and commits

pub mod antiforgery;
pub mod api;
pub mod assertion;
pub mod callback;
pub mod constants;
pub mod error;
pub mod http;
pub mod strategy;
pub mod validator;

pub use antiforgery::AntiForgeryToken;
pub use api::{BoxApi, ClientHandle, Identity, TokenResponse};
pub use constants::*;
pub use error::{AuthError, Result};
pub use http::HttpBoxApi;
pub use strategy::{StrategyKind, TokenBundle};
