//! Request middleware applied before a request leaves the client

pub mod auth;

pub use auth::{AuthConfig, AuthError};
