//! Library exports for clientops-session, shared between the console binary and tests.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod navigation;
pub mod session;
pub mod store;
pub mod utils;
