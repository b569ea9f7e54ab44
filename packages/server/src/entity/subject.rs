use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub subject_name: String,

    #[sea_orm(has_many)]
    pub exam_details: HasMany<super::exam_detail::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
