//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (in hook scope):
//!     → before_auth callback (optional)
//!     → authenticator.rs (who is signed in, per the identity layer)
//!     → access_control.rs (public route? signed in? else redirect)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Credentials are never inspected here; the identity layer is external
//! - The sign-in page is always public
//! - Routing only runs after the gate lets the request through

pub mod access_control;
pub mod authenticator;

pub use access_control::{AccessGate, AuthContext, BeforeAuth, GateOutcome};
pub use authenticator::{AnonymousAuthenticator, Authenticator, TrustedHeaderAuthenticator};
