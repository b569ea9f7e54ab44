//! Transactional creation of an exam record together with its details.

use std::collections::HashSet;

use common::ValidationError;
use common::models::{CreateExamRequest, ExamRecord};
use common::validation::validate_exam_details;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, SqliteTransactionMode, TransactionOptions,
    TransactionTrait,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::repo::{self, RepoError};

pub const STUDENT_NOT_FOUND: &str = "Student not found.";

/// Why an exam record could not be created. Nothing is persisted in any case.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Validation(err.to_string())
    }
}

impl From<RepoError> for WorkflowError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(msg) => WorkflowError::Conflict(msg),
            RepoError::Db(e) => WorkflowError::Storage(e),
        }
    }
}

/// Create an exam record and its details atomically, then return it as stored.
///
/// The detail set is checked before a transaction is opened. Every failure after
/// that point rolls the transaction back before the error is returned.
#[instrument(skip(db, request), fields(student_id = request.student_id, exam_year = request.exam_year))]
pub async fn create_exam(
    db: &DatabaseConnection,
    request: CreateExamRequest,
) -> Result<ExamRecord, WorkflowError> {
    validate_exam_details(&request.details)?;

    let master_id = persist_exam(db, &request).await?;
    info!(master_id, details = request.details.len(), "Exam record created");

    repo::exam::find_exam_record(db, master_id)
        .await?
        .ok_or_else(|| {
            WorkflowError::Storage(DbErr::RecordNotFound(format!(
                "exam_master {master_id} missing after commit"
            )))
        })
}

/// Run [`record_exam`] in its own transaction, committing on success and rolling back otherwise.
///
/// SQLite transactions start IMMEDIATE so concurrent writers queue on the write
/// lock and a lost (student, year) race reports the unique violation. Postgres
/// ignores the mode.
async fn persist_exam(
    db: &DatabaseConnection,
    request: &CreateExamRequest,
) -> Result<i32, WorkflowError> {
    let txn = db
        .begin_with_options(TransactionOptions {
            sqlite_transaction_mode: Some(SqliteTransactionMode::Immediate),
            ..Default::default()
        })
        .await?;

    let master_id = match record_exam(&txn, request).await {
        Ok(id) => id,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("Rollback failed after {err}: {rollback_err}");
            }
            return Err(err);
        }
    };
    txn.commit().await?;
    Ok(master_id)
}

/// Ordered guard clauses and inserts. Runs inside the caller's transaction.
async fn record_exam<C: ConnectionTrait>(
    txn: &C,
    request: &CreateExamRequest,
) -> Result<i32, WorkflowError> {
    if repo::student::find_student(txn, request.student_id)
        .await?
        .is_none()
    {
        return Err(WorkflowError::NotFound(STUDENT_NOT_FOUND.into()));
    }

    if repo::exam::exam_exists(txn, request.student_id, request.exam_year).await? {
        return Err(WorkflowError::Conflict(repo::exam::DUPLICATE_EXAM.into()));
    }

    let mut seen = HashSet::new();
    let subject_ids: Vec<i32> = request
        .details
        .iter()
        .map(|d| d.subject_id)
        .filter(|id| seen.insert(*id))
        .collect();
    let found = repo::subject::count_existing_subjects(txn, &subject_ids).await?;
    if found < subject_ids.len() as u64 {
        let missing = repo::subject::missing_subject_ids(txn, &subject_ids).await?;
        let listed = missing
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(WorkflowError::Validation(format!(
            "One or more subjects are invalid: {listed}"
        )));
    }

    // A concurrent insert for the same (student, year) surfaces here as a unique violation.
    let master_id =
        repo::exam::insert_exam_master(txn, request.student_id, request.exam_year).await?;

    for detail in &request.details {
        repo::exam::insert_exam_detail(txn, master_id, detail.subject_id, detail.marks).await?;
    }

    let outcome = repo::exam::finalize_exam(txn, master_id).await?;
    tracing::debug!(
        master_id,
        total_mark = outcome.total_mark,
        verdict = %outcome.verdict,
        "Exam record finalized"
    );

    Ok(master_id)
}
