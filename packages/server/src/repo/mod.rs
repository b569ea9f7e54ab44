//! Data access layer: one function per read/write need.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so it runs the
//! same way on the pool or inside an open transaction. Lookups return `None`
//! for a missing row; inserts report unique-constraint violations as
//! [`RepoError::Duplicate`].

pub mod exam;
pub mod student;
pub mod subject;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Turn a unique-constraint violation into [`RepoError::Duplicate`] with the given message.
pub(crate) fn map_unique_violation(err: DbErr, message: &str) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepoError::Duplicate(message.to_string()),
        _ => RepoError::Db(err),
    }
}
