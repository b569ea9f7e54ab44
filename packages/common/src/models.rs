//! JSON shapes exchanged between the exam server and its clients.
//!
//! Field names keep the `studentID` / `examYear` casing the API has always used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::ExamVerdict;

/// A student who can sit exams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Student {
    #[serde(rename = "studentID")]
    #[schema(example = 1)]
    pub student_id: i32,
    #[serde(rename = "studentName")]
    #[schema(example = "Alice Johnson")]
    pub student_name: String,
    #[schema(example = "alice@example.com")]
    pub mail: String,
}

/// A subject marks are recorded against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Subject {
    #[serde(rename = "subjectID")]
    #[schema(example = 10)]
    pub subject_id: i32,
    #[serde(rename = "subjectName")]
    #[schema(example = "Mathematics")]
    pub subject_name: String,
}

/// One subject's mark within an exam record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExamDetail {
    #[serde(rename = "dtlsID")]
    pub dtls_id: i32,
    #[serde(rename = "masterID")]
    pub master_id: i32,
    #[serde(rename = "subjectID")]
    pub subject_id: i32,
    /// Mark between 0 and 100 with at most two decimal places.
    #[schema(example = 72.5)]
    pub marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
}

/// A student's aggregated result for one exam year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExamRecord {
    #[serde(rename = "masterID")]
    pub master_id: i32,
    #[serde(rename = "studentID")]
    pub student_id: i32,
    #[serde(rename = "examYear")]
    #[schema(example = 2024)]
    pub exam_year: i32,
    /// Sum of all detail marks, computed by the server.
    #[serde(rename = "totalMark")]
    pub total_mark: f64,
    /// PASS only when every subject reaches the pass mark.
    #[serde(rename = "passOrFail")]
    pub pass_or_fail: ExamVerdict,
    #[serde(rename = "createTime")]
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
    #[serde(default)]
    pub details: Vec<ExamDetail>,
}

/// Request body for creating a student.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateStudentRequest {
    /// Full name (5-250 characters).
    #[serde(rename = "studentName")]
    #[schema(example = "Alice Johnson")]
    pub student_name: String,
    /// Unique mail address.
    #[schema(example = "alice@example.com")]
    pub mail: String,
}

/// Request body for creating a subject.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateSubjectRequest {
    /// Subject name (1-200 characters).
    #[serde(rename = "subjectName")]
    #[schema(example = "Physics")]
    pub subject_name: String,
}

/// One subject/mark pair submitted with a new exam record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExamDetailInput {
    #[serde(rename = "subjectID")]
    #[schema(example = 10)]
    pub subject_id: i32,
    #[schema(example = 40.0)]
    pub marks: f64,
}

/// Request body for creating an exam record together with its details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateExamRequest {
    #[serde(rename = "studentID")]
    #[schema(example = 1)]
    pub student_id: i32,
    /// Exam year (2000-2100).
    #[serde(rename = "examYear")]
    #[schema(example = 2024)]
    pub exam_year: i32,
    /// At least one entry; subject IDs must be distinct.
    pub details: Vec<ExamDetailInput>,
}
