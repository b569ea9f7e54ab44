//! Input rules shared by the server (authoritative) and the form client (advisory).

use std::collections::HashSet;

use thiserror::Error;

use crate::models::ExamDetailInput;

pub const STUDENT_NAME_MIN: usize = 5;
pub const STUDENT_NAME_MAX: usize = 250;
pub const SUBJECT_NAME_MAX: usize = 200;
pub const MIN_EXAM_YEAR: i32 = 2000;
pub const MAX_EXAM_YEAR: i32 = 2100;
pub const MIN_MARK: f64 = 0.0;
pub const MAX_MARK: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Student name must be between 5 and 250 characters.")]
    StudentName,

    #[error("Valid email address is required.")]
    Mail,

    #[error("Subject name must be between 1 and 200 characters.")]
    SubjectName,

    #[error("Exam year must be between 2000 and 2100.")]
    ExamYear,

    #[error("At least one subject mark is required.")]
    NoDetails,

    #[error("Duplicate subjects are not allowed. Each subject can only be added once.")]
    DuplicateSubjects(Vec<i32>),

    #[error("Marks must be between 0 and 100.")]
    MarksOutOfRange,

    #[error("Marks can have at most two decimal places.")]
    MarksPrecision,
}

/// Validate a student name (5-250 characters after trimming).
pub fn validate_student_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if !(STUDENT_NAME_MIN..=STUDENT_NAME_MAX).contains(&len) {
        return Err(ValidationError::StudentName);
    }
    Ok(())
}

/// Validate a mail address: non-blank and containing `@`.
pub fn validate_mail(mail: &str) -> Result<(), ValidationError> {
    let mail = mail.trim();
    if mail.is_empty() || !mail.contains('@') {
        return Err(ValidationError::Mail);
    }
    Ok(())
}

pub fn validate_subject_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 || len > SUBJECT_NAME_MAX {
        return Err(ValidationError::SubjectName);
    }
    Ok(())
}

pub fn validate_exam_year(year: i32) -> Result<(), ValidationError> {
    if !(MIN_EXAM_YEAR..=MAX_EXAM_YEAR).contains(&year) {
        return Err(ValidationError::ExamYear);
    }
    Ok(())
}

/// Validate a single mark: finite, within 0-100, at most two decimal places.
pub fn validate_marks(marks: f64) -> Result<(), ValidationError> {
    if !marks.is_finite() || !(MIN_MARK..=MAX_MARK).contains(&marks) {
        return Err(ValidationError::MarksOutOfRange);
    }
    let scaled = marks * 100.0;
    if (scaled - scaled.round()).abs() > 1e-6 {
        return Err(ValidationError::MarksPrecision);
    }
    Ok(())
}

/// Subject IDs that appear more than once, in order of their second occurrence.
pub fn duplicate_subject_ids<I>(ids: I) -> Vec<i32>
where
    I: IntoIterator<Item = i32>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Validate the detail set of a new exam record without touching storage.
pub fn validate_exam_details(details: &[ExamDetailInput]) -> Result<(), ValidationError> {
    if details.is_empty() {
        return Err(ValidationError::NoDetails);
    }
    let duplicates = duplicate_subject_ids(details.iter().map(|d| d.subject_id));
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateSubjects(duplicates));
    }
    for detail in details {
        validate_marks(detail.marks)?;
    }
    Ok(())
}
