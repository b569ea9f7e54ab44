use common::models::{CreateExamRequest, ExamDetail, ExamRecord, Student, Subject};
use common::validation::{validate_exam_details, validate_exam_year};

use crate::entity::{exam_detail, exam_master, student, subject};
use crate::error::AppError;

/// Assemble a wire record from a master row, its student, and its already-mapped details.
pub fn exam_record_from_rows(
    master: exam_master::Model,
    student: Option<student::Model>,
    details: Vec<ExamDetail>,
) -> ExamRecord {
    ExamRecord {
        master_id: master.id,
        student_id: master.student_id,
        exam_year: master.exam_year,
        total_mark: master.total_mark,
        pass_or_fail: master.pass_or_fail,
        create_time: master.created_at,
        student: student.map(Student::from),
        details,
    }
}

pub fn exam_detail_from_rows(
    detail: exam_detail::Model,
    subject: Option<subject::Model>,
) -> ExamDetail {
    ExamDetail {
        dtls_id: detail.id,
        master_id: detail.master_id,
        subject_id: detail.subject_id,
        marks: detail.marks,
        subject: subject.map(Subject::from),
    }
}

/// Shape and range checks for a new exam record, before any storage access.
pub fn validate_create_exam(req: &CreateExamRequest) -> Result<(), AppError> {
    validate_exam_year(req.exam_year)?;
    validate_exam_details(&req.details)?;
    Ok(())
}
