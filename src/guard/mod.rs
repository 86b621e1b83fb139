//! Navigation authorization: the pure decision rules and the async guard
//! that keeps the session's identity fresh before role checks.

pub mod decision;
pub mod guard;

pub use decision::{decide, GuardRoutes};
pub use guard::NavigationGuard;
