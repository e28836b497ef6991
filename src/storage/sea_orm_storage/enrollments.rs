//! 选课存储操作

use super::SeaOrmStorage;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{GradeSysError, Result};
use crate::models::scores::{
    entities::{Enrollment, EnrollmentRecord},
    requests::EnrollRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 选课，重复选课直接返回已有记录
    pub async fn enroll_impl(&self, req: EnrollRequest) -> Result<Enrollment> {
        let existing = Enrollments::find()
            .filter(Column::StudentId.eq(req.student_id.as_str()))
            .filter(Column::CourseId.eq(req.course_id.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        if let Some(model) = existing {
            return Ok(model.into_enrollment());
        }

        if self.get_student_by_id_impl(&req.student_id).await?.is_none() {
            return Err(GradeSysError::not_found(format!(
                "学生不存在: {}",
                req.student_id
            )));
        }
        if self.get_course_by_id_impl(&req.course_id).await?.is_none() {
            return Err(GradeSysError::not_found(format!(
                "课程不存在: {}",
                req.course_id
            )));
        }

        let model = ActiveModel {
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            enrollment_date: Set(req.enrollment_date),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("选课失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn list_enrollments_by_student_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<EnrollmentRecord>> {
        let rows = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Courses)
            .order_by_asc(Column::EnrollmentDate)
            .order_by_asc(Column::CourseId)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| {
                let course = course?;
                Some(EnrollmentRecord {
                    course_id: enrollment.course_id,
                    course_name: course.course_name,
                    credits: course.credits,
                    enrollment_date: enrollment.enrollment_date,
                })
            })
            .collect())
    }

    pub async fn count_enrollments_by_course_impl(&self, course_id: &str) -> Result<i64> {
        let count = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("统计选课人数失败: {e}")))?;

        Ok(count as i64)
    }
}
