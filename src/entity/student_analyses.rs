//! 学生分析实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: String,
    pub analysis_type: String,
    pub title: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub input_data: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub analysis_result: Option<String>,
    pub ai_confidence: Option<f64>,
    #[sea_orm(column_type = "Text")]
    pub prompt_template: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub actual_prompt: Option<String>,
    pub analyzed_by: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub analyzed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::StudentId",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(has_many = "super::ai_service_logs::Entity")]
    ServiceLogs,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::ai_service_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_analysis(self) -> crate::models::analysis::entities::StudentAnalysis {
        use crate::models::analysis::entities::{AnalysisStatus, AnalysisType, StudentAnalysis};
        use chrono::{DateTime, Utc};

        StudentAnalysis {
            id: self.id,
            student_id: self.student_id,
            analysis_type: self
                .analysis_type
                .parse()
                .unwrap_or(AnalysisType::Comprehensive),
            title: self.title,
            status: self.status.parse().unwrap_or(AnalysisStatus::Pending),
            input_data: serde_json::from_str(&self.input_data).unwrap_or_default(),
            analysis_result: self.analysis_result,
            ai_confidence: self.ai_confidence,
            prompt_template: self.prompt_template,
            actual_prompt: self.actual_prompt,
            analyzed_by: self.analyzed_by,
            error_message: self.error_message,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            analyzed_at: self
                .analyzed_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        }
    }
}
