//! Who the current user is, if anyone.

pub mod session;
pub mod state;

pub use session::Session;
pub use state::SessionState;
