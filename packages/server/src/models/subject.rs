use common::models::{CreateSubjectRequest, Subject};
use common::validation::validate_subject_name;

use crate::error::AppError;

impl From<crate::entity::subject::Model> for Subject {
    fn from(m: crate::entity::subject::Model) -> Self {
        Self {
            subject_id: m.id,
            subject_name: m.subject_name,
        }
    }
}

pub fn validate_create_subject(req: &CreateSubjectRequest) -> Result<(), AppError> {
    validate_subject_name(&req.subject_name)?;
    Ok(())
}
