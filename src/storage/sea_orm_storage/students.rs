//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{GradeSysError, Result};
use crate::models::students::{entities::Student, requests::CreateStudentRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建学生，学号已存在时返回冲突
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        if self.get_student_by_id_impl(&req.student_id).await?.is_some() {
            return Err(GradeSysError::conflict(format!(
                "学号已存在: {}",
                req.student_id
            )));
        }

        let model = ActiveModel {
            student_id: Set(req.student_id),
            name: Set(req.name),
            gender: Set(req.gender.to_string()),
            birth_date: Set(req.birth_date),
            major: Set(req.major),
            college: Set(req.college),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, student_id: &str) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_impl(&self) -> Result<Vec<Student>> {
        let students = Students::find()
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn count_students_impl(&self) -> Result<i64> {
        let count = Students::find()
            .count(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("统计学生数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, student_id: &str) -> Result<bool> {
        let result = Students::delete_by_id(student_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
