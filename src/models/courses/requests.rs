use serde::Deserialize;
use ts_rs::TS;

use crate::utils::validate::validate_course_id;

// 创建课程请求（演示数据和测试使用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateCourseRequest {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_course_id(&self.course_id).map_err(|e| e.to_string())?;
        if self.course_name.trim().is_empty() {
            return Err("Course name must not be empty".to_string());
        }
        if self.credits < 0 {
            return Err("Credits must not be negative".to_string());
        }
        Ok(())
    }
}
