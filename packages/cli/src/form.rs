//! In-memory state for entering an exam record.
//!
//! Mirrors the server's rules so mistakes surface before submitting; the server
//! still re-validates everything.

use chrono::Datelike;
use common::models::{CreateExamRequest, CreateStudentRequest, ExamDetailInput, Student, Subject};
use common::validation::{
    duplicate_subject_ids, validate_exam_year, validate_mail, validate_marks,
    validate_student_name,
};
use common::{ExamOutcome, ExamVerdict, ValidationError};
use thiserror::Error;

/// Subject searches shorter than this show the whole catalogue.
pub const SUBJECT_SEARCH_MIN: usize = 2;

/// One subject/mark line of the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailRow {
    pub subject_id: Option<i32>,
    pub subject_name: String,
    pub marks: Option<f64>,
}

/// A problem that blocks submission. Rows are numbered from 1.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FormIssue {
    #[error("Please select a student.")]
    NoStudent,

    #[error("Row {row}: please choose a subject.")]
    MissingSubject { row: usize },

    #[error("Row {row}: please enter marks.")]
    MissingMarks { row: usize },

    #[error("Row {row}: {source}")]
    InvalidMarks {
        row: usize,
        source: ValidationError,
    },

    #[error(transparent)]
    Rule(#[from] ValidationError),
}

#[derive(Clone, Debug)]
pub struct ExamForm {
    students: Vec<Student>,
    subjects: Vec<Subject>,
    student_query: String,
    student_id: Option<i32>,
    exam_year: i32,
    rows: Vec<DetailRow>,
}

impl Default for ExamForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamForm {
    /// An empty form for the current year with a single blank row.
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            subjects: Vec::new(),
            student_query: String::new(),
            student_id: None,
            exam_year: current_year(),
            rows: vec![DetailRow::default()],
        }
    }

    pub fn load_lookups(&mut self, students: Vec<Student>, subjects: Vec<Subject>) {
        self.students = students;
        self.subjects = subjects;
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn rows(&self) -> &[DetailRow] {
        &self.rows
    }

    pub fn student_id(&self) -> Option<i32> {
        self.student_id
    }

    /// Text shown in the student field: the search text, or `Name (mail)` once selected.
    pub fn student_query(&self) -> &str {
        &self.student_query
    }

    pub fn exam_year(&self) -> i32 {
        self.exam_year
    }

    /// Students whose name or mail contains `query`, ignoring case.
    ///
    /// Typing drops any previous selection, since the text no longer names it.
    pub fn filter_students(&mut self, query: &str) -> Vec<&Student> {
        self.student_query = query.to_string();
        self.student_id = None;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.students.iter().collect();
        }
        self.students
            .iter()
            .filter(|s| {
                s.student_name.to_lowercase().contains(&needle)
                    || s.mail.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Subjects whose name contains `query`, ignoring case.
    pub fn filter_subjects(&self, query: &str) -> Vec<&Subject> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < SUBJECT_SEARCH_MIN {
            return self.subjects.iter().collect();
        }
        self.subjects
            .iter()
            .filter(|s| s.subject_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Select a cached student. Returns `None` if the ID is not in the cache.
    pub fn select_student(&mut self, student_id: i32) -> Option<&Student> {
        let student = self.students.iter().find(|s| s.student_id == student_id)?;
        self.student_query = format!("{} ({})", student.student_name, student.mail);
        self.student_id = Some(student_id);
        Some(student)
    }

    /// Cache a newly registered student and select it.
    pub fn add_student(&mut self, student: Student) {
        let id = student.student_id;
        self.students.push(student);
        self.select_student(id);
    }

    /// Put a cached subject on `row`. Returns `false` for an unknown row or subject.
    pub fn select_subject(&mut self, row: usize, subject_id: i32) -> bool {
        let Some(subject) = self.subjects.iter().find(|s| s.subject_id == subject_id) else {
            return false;
        };
        let Some(line) = self.rows.get_mut(row) else {
            return false;
        };
        line.subject_id = Some(subject.subject_id);
        line.subject_name = subject.subject_name.clone();
        true
    }

    /// Append a blank row and return its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(DetailRow::default());
        self.rows.len() - 1
    }

    /// Remove a row. The last remaining row is never removed.
    pub fn remove_row(&mut self, row: usize) -> bool {
        if self.rows.len() <= 1 || row >= self.rows.len() {
            return false;
        }
        self.rows.remove(row);
        true
    }

    pub fn set_marks(&mut self, row: usize, marks: Option<f64>) -> bool {
        match self.rows.get_mut(row) {
            Some(line) => {
                line.marks = marks;
                true
            }
            None => false,
        }
    }

    pub fn set_year(&mut self, year: i32) {
        self.exam_year = year;
    }

    fn outcome(&self) -> ExamOutcome {
        ExamOutcome::from_marks(self.rows.iter().map(|r| r.marks.unwrap_or(0.0)))
    }

    /// Preview of the total the server will compute. Blank marks count as zero.
    pub fn total_mark(&self) -> f64 {
        self.outcome().total_mark
    }

    /// Preview of the verdict; FAIL when there are no rows.
    pub fn pass_or_fail(&self) -> ExamVerdict {
        self.outcome().verdict
    }

    /// Every issue that would block submission, in form order.
    pub fn validate(&self) -> Result<(), Vec<FormIssue>> {
        let mut issues = Vec::new();

        if self.student_id.is_none() {
            issues.push(FormIssue::NoStudent);
        }
        if let Err(e) = validate_exam_year(self.exam_year) {
            issues.push(e.into());
        }
        if self.rows.is_empty() {
            issues.push(ValidationError::NoDetails.into());
        }

        for (index, line) in self.rows.iter().enumerate() {
            let row = index + 1;
            if line.subject_id.is_none() {
                issues.push(FormIssue::MissingSubject { row });
            }
            match line.marks {
                None => issues.push(FormIssue::MissingMarks { row }),
                Some(marks) => {
                    if let Err(source) = validate_marks(marks) {
                        issues.push(FormIssue::InvalidMarks { row, source });
                    }
                }
            }
        }

        let duplicates = duplicate_subject_ids(self.rows.iter().filter_map(|r| r.subject_id));
        if !duplicates.is_empty() {
            issues.push(ValidationError::DuplicateSubjects(duplicates).into());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Build the request body, or the issues that prevent it.
    pub fn to_request(&self) -> Result<CreateExamRequest, Vec<FormIssue>> {
        self.validate()?;
        let student_id = self.student_id.ok_or_else(|| vec![FormIssue::NoStudent])?;

        // Every row is complete once validation passes.
        let details = self
            .rows
            .iter()
            .filter_map(|r| {
                Some(ExamDetailInput {
                    subject_id: r.subject_id?,
                    marks: r.marks?,
                })
            })
            .collect();

        Ok(CreateExamRequest {
            student_id,
            exam_year: self.exam_year,
            details,
        })
    }

    /// Clear everything except the cached lookups.
    pub fn reset(&mut self) {
        self.student_query.clear();
        self.student_id = None;
        self.exam_year = current_year();
        self.rows = vec![DetailRow::default()];
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// A student about to be registered from the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentDraft {
    pub student_name: String,
    pub mail: String,
}

impl StudentDraft {
    pub fn new(student_name: impl Into<String>, mail: impl Into<String>) -> Self {
        Self {
            student_name: student_name.into(),
            mail: mail.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let issues: Vec<ValidationError> = [
            validate_student_name(&self.student_name),
            validate_mail(&self.mail),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    pub fn to_request(&self) -> Result<CreateStudentRequest, Vec<ValidationError>> {
        self.validate()?;
        Ok(CreateStudentRequest {
            student_name: self.student_name.trim().to_string(),
            mail: self.mail.trim().to_string(),
        })
    }
}
