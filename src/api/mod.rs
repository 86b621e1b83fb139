//! The HTTP collaborator behind login and identity lookup.

pub mod identity_client;
#[cfg(test)]
pub(crate) mod scripted;

pub use identity_client::{HttpIdentityClient, IdentityClient, LOGIN_PATH, ME_PATH};
