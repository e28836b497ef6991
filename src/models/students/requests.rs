use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::Gender;
use crate::utils::validate::{validate_person_name, validate_student_id};

// 创建学生请求（演示数据和测试使用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub student_id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub major: String,
    pub college: String,
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_student_id(&self.student_id).map_err(|e| e.to_string())?;
        validate_person_name(&self.name).map_err(|e| e.to_string())?;
        if self.major.trim().is_empty() || self.college.trim().is_empty() {
            return Err("Major and college must not be empty".to_string());
        }
        Ok(())
    }
}
