use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exam_detail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub master_id: i32,
    #[sea_orm(belongs_to, from = "master_id", to = "id")]
    pub master: HasOne<super::exam_master::Entity>,

    pub subject_id: i32,
    #[sea_orm(belongs_to, from = "subject_id", to = "id")]
    pub subject: HasOne<super::subject::Entity>,

    pub marks: f64, // 0-100, two decimal places
}

impl ActiveModelBehavior for ActiveModel {}
