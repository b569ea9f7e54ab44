use common::models::{CreateStudentRequest, Student};
use common::validation::{validate_mail, validate_student_name};

use crate::error::AppError;

impl From<crate::entity::student::Model> for Student {
    fn from(m: crate::entity::student::Model) -> Self {
        Self {
            student_id: m.id,
            student_name: m.student_name,
            mail: m.mail,
        }
    }
}

pub fn validate_create_student(req: &CreateStudentRequest) -> Result<(), AppError> {
    validate_student_name(&req.student_name)?;
    validate_mail(&req.mail)?;
    Ok(())
}
