//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{GradeSysError, Result};
use crate::models::courses::{entities::Course, requests::CreateCourseRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程，课程号已存在时返回冲突
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        if self.get_course_by_id_impl(&req.course_id).await?.is_some() {
            return Err(GradeSysError::conflict(format!(
                "课程号已存在: {}",
                req.course_id
            )));
        }

        let model = ActiveModel {
            course_id: Set(req.course_id),
            course_name: Set(req.course_name),
            credits: Set(req.credits),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: &str) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_impl(&self) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .order_by_asc(Column::CourseId)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }
}
