use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_name: String,
    #[sea_orm(unique)]
    pub mail: String,

    #[sea_orm(has_many)]
    pub exams: HasMany<super::exam_master::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
