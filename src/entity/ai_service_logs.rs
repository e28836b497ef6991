//! AI 服务调用日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ai_service_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub request_type: String,
    pub student_analysis_id: Option<i64>,
    #[sea_orm(column_type = "Text")]
    pub request_prompt: String,
    #[sea_orm(column_type = "Text")]
    pub request_data: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response_content: Option<String>,
    pub response_time: Option<f64>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_analyses::Entity",
        from = "Column::StudentAnalysisId",
        to = "super::student_analyses::Column::Id",
        on_delete = "Cascade"
    )]
    Analysis,
}

impl Related<super::student_analyses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analysis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_service_log(self) -> crate::models::service_logs::entities::AiServiceLog {
        use crate::models::service_logs::entities::{AiServiceLog, LogStatus, RequestType};
        use chrono::{DateTime, Utc};

        AiServiceLog {
            id: self.id,
            request_type: self.request_type.parse().unwrap_or(RequestType::Analysis),
            student_analysis_id: self.student_analysis_id,
            request_prompt: self.request_prompt,
            request_data: serde_json::from_str(&self.request_data).unwrap_or_default(),
            response_content: self.response_content,
            response_time: self.response_time,
            status: self.status.parse().unwrap_or(LogStatus::Failed),
            error_message: self.error_message,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
