//! opsgate-guard: render-time gating over the permission store
//!
//! Guards consume the store's current snapshot at render time and decide
//! what may be shown:
//! - [`Authorization`] - the per-screen facade bundling capability checks
//!   with the store's load state
//! - [`Can`] - element-level guard: content, or a fallback, or nothing
//! - [`RouteGuard`] - page-level guard with an explicit
//!   `Loading / Allowed / Denied` state machine
//!
//! The single non-negotiable contract: unknown is never treated as allowed.
//! Every state other than `Loaded` renders the fallback or loading surface,
//! regardless of what the eventual grant set will be.

pub mod authorization;
pub mod can;
pub mod route;

// Re-export commonly used types at the crate root
pub use authorization::Authorization;
pub use can::Can;
pub use route::{DenialReason, RedirectTarget, RouteDecision, RouteGuard};
