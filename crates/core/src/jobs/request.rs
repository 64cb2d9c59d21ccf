//! Typed, fail-closed validation of job requests.

use serde::Deserialize;

use super::kind::JobKind;
use crate::actor::Actor;
use crate::error::CoreError;
use crate::store::CategoryStore;
use crate::types::DbId;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Admin access required";
pub const INVALID_CATEGORY_MESSAGE: &str = "Invalid category ID";
pub const CATEGORY_NOT_FOUND_MESSAGE: &str = "Category not found or not a level 1 category";

/// Raw query string of the recategorization endpoint.
///
/// The id stays a string here so that a malformed value is reported as an
/// invalid argument rather than as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecategorizeQuery {
    pub category_id: Option<String>,
}

/// Why a job request was refused before anything was launched.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// No valid session at all.
    #[error("Unauthorized: Admin access required")]
    Unauthenticated,

    /// A session without the admin capability.
    #[error("Unauthorized: Admin access required")]
    NotAdmin,

    #[error("Invalid category ID")]
    InvalidArgument,

    #[error("Category not found or not a level 1 category")]
    NotFound,

    #[error(transparent)]
    Store(#[from] CoreError),
}

/// An accepted job request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub kind: JobKind,
    pub actor: Actor,
}

/// Require an actor holding the admin capability.
pub fn authorize(actor: Option<Actor>) -> Result<Actor, RequestError> {
    let actor = actor.ok_or(RequestError::Unauthenticated)?;
    if !actor.can_run_jobs() {
        return Err(RequestError::NotAdmin);
    }
    Ok(actor)
}

/// Parse a strictly positive base-10 category id.
///
/// No leading sign, whitespace, or trailing garbage is accepted.
pub fn parse_category_id(raw: Option<&str>) -> Result<DbId, RequestError> {
    let raw = raw.ok_or(RequestError::InvalidArgument)?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RequestError::InvalidArgument);
    }
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RequestError::InvalidArgument),
    }
}

/// Validate a recategorization request against the category store.
pub async fn recategorize(
    store: &dyn CategoryStore,
    actor: Option<Actor>,
    query: &RecategorizeQuery,
) -> Result<JobRequest, RequestError> {
    let actor = authorize(actor)?;
    let category_id = parse_category_id(query.category_id.as_deref())?;
    let category = store
        .find_level_one(category_id)
        .await?
        .filter(|category| category.is_level_one())
        .ok_or(RequestError::NotFound)?;

    Ok(JobRequest {
        kind: JobKind::Recategorize {
            category_id: category.id,
            category_name: category.name,
        },
        actor,
    })
}

/// Validate a scrape request; only the caller is checked.
pub fn scrape(actor: Option<Actor>) -> Result<JobRequest, RequestError> {
    Ok(JobRequest {
        kind: JobKind::Scrape,
        actor: authorize(actor)?,
    })
}

/// Validate a summarize request; only the caller is checked.
pub fn summarize(actor: Option<Actor>) -> Result<JobRequest, RequestError> {
    Ok(JobRequest {
        kind: JobKind::Summarize,
        actor: authorize(actor)?,
    })
}
