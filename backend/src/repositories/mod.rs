//! Module for database repositories.
//!
//! This module encapsulates the SQL for each aggregate and returns domain
//! models, leaving policy decisions (conflict handling, fallbacks) to the
//! service layer.

pub mod course_repository;
pub mod enrollment_repository;
pub mod user_repository;

/// Finds the underlying sqlx error anywhere in an error chain.
fn as_sqlx_error(err: &anyhow::Error) -> Option<&sqlx::Error> {
    err.chain().find_map(|cause| cause.downcast_ref::<sqlx::Error>())
}

/// True when the database rejected a row for violating a unique constraint.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    as_sqlx_error(err)
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}

/// True when the store could not be reached at all, as opposed to rejecting
/// a particular statement. These are the errors that trigger the catalog's
/// degraded mode.
pub fn is_store_unreachable(err: &anyhow::Error) -> bool {
    matches!(
        as_sqlx_error(err),
        Some(sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pool_closed_is_unreachable() {
        let err = anyhow::Error::from(sqlx::Error::PoolClosed);
        assert!(is_store_unreachable(&err));
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_classification_sees_through_context() {
        let err = Err::<(), _>(sqlx::Error::PoolTimedOut)
            .context("listing courses")
            .unwrap_err();
        assert!(is_store_unreachable(&err));
    }

    #[test]
    fn test_plain_errors_are_not_unreachable() {
        let err = anyhow::anyhow!("row not found");
        assert!(!is_store_unreachable(&err));
        assert!(!is_unique_violation(&err));
    }
}
