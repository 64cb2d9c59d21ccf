//! Domain logic for the scrapedesk backend.
//!
//! Everything here is free of HTTP and SQL concerns: the collaborator
//! traits ([`store`]) are implemented by the `db` crate and consumed by the
//! `api` crate, and the [`jobs`] subsystem only talks to the OS.

pub mod actor;
pub mod category;
pub mod error;
pub mod hashing;
pub mod jobs;
pub mod store;
pub mod types;
