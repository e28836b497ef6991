use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::utils::validate::{validate_course_id, validate_score, validate_student_id};

// 录入成绩请求，同一学生同一课程重复录入时覆盖
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct UpsertScoreRequest {
    pub student_id: String,
    pub course_id: String,
    pub score: f64,
    pub date: NaiveDate,
}

impl UpsertScoreRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_student_id(&self.student_id).map_err(|e| e.to_string())?;
        validate_course_id(&self.course_id).map_err(|e| e.to_string())?;
        validate_score(self.score).map_err(|e| e.to_string())?;
        Ok(())
    }
}

// 选课请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct EnrollRequest {
    pub student_id: String,
    pub course_id: String,
    pub enrollment_date: NaiveDate,
}
