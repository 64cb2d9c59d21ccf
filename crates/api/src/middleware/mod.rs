//! Session extractors for Axum handlers.
//!
//! - [`auth::CurrentActor`] -- Resolves the session if there is one, never rejects for a missing session.
//! - [`auth::AuthUser`] -- Requires a valid session.

pub mod auth;
