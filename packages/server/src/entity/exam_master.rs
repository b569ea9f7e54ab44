use common::ExamVerdict;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One student's aggregated result for one exam year.
///
/// `(student_id, exam_year)` is unique; see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exam_master")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub exam_year: i32,
    /// Written by the finalize step; zero until then.
    pub total_mark: f64,
    /// Written by the finalize step; FAIL until then.
    pub pass_or_fail: ExamVerdict,

    #[sea_orm(has_many)]
    pub details: HasMany<super::exam_detail::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
