//! Session lifecycle for Box authentication
//!
//! Holds the per-session credential state and the coordinator that drives
//! a chosen strategy from validation through protocol execution to an
//! all-or-nothing session commit. One coordinator per user session;
//! distinct sessions share nothing.
//!
//! Session lifecycle:
//! 1. UI calls `AuthCoordinator::select_strategy()`
//! 2. Delegated flow only: `begin_delegated()` returns the URL to open
//! 3. `submit()` validates secrets, runs the strategy, verifies identity,
//!    and commits to the `SessionStore`
//! 4. Downstream pages read `is_authenticated()` / `current_client()`
//! 5. `logout()` resets everything back to unauthenticated

pub mod coordinator;
pub mod error;
pub mod session;

pub use coordinator::{AuthCoordinator, Phase, StrategyInput};
pub use error::{Error, Result};
pub use session::{Session, SessionStatus, SessionStore};
