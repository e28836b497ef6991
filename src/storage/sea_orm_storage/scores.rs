//! 成绩存储操作

use super::SeaOrmStorage;
use crate::analysis::round2;
use crate::entity::courses::Entity as Courses;
use crate::entity::scores::{ActiveModel, Column, Entity as Scores};
use crate::entity::students::Entity as Students;
use crate::errors::{GradeSysError, Result};
use crate::models::scores::{
    entities::{CourseScoreRecord, Score, ScoreRecord},
    requests::UpsertScoreRequest,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 录入成绩，已有记录时覆盖分数和日期
    pub async fn upsert_score_impl(&self, req: UpsertScoreRequest) -> Result<Score> {
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

        let value = round2(req.score);
        let existing = Scores::find()
            .filter(Column::StudentId.eq(req.student_id.as_str()))
            .filter(Column::CourseId.eq(req.course_id.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询成绩失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.score = Set(value);
                active.date = Set(req.date);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| GradeSysError::database_operation(format!("更新成绩失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    student_id: Set(req.student_id),
                    course_id: Set(req.course_id),
                    score: Set(value),
                    date: Set(req.date),
                    ..Default::default()
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| GradeSysError::database_operation(format!("录入成绩失败: {e}")))?
            }
        };

        Ok(result.into_score())
    }

    /// 学生的全部成绩（附课程信息），按日期正序
    pub async fn list_scores_by_student_impl(&self, student_id: &str) -> Result<Vec<ScoreRecord>> {
        let rows = Scores::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Courses)
            .order_by_asc(Column::Date)
            .order_by_asc(Column::CourseId)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(score, course)| {
                let course = course?;
                Some(ScoreRecord {
                    course_id: score.course_id,
                    course_name: course.course_name,
                    credits: course.credits,
                    score: score.score,
                    date: score.date,
                })
            })
            .collect())
    }

    /// 课程的全部成绩（附学生信息），按分数倒序
    pub async fn list_scores_by_course_impl(
        &self,
        course_id: &str,
    ) -> Result<Vec<CourseScoreRecord>> {
        let rows = Scores::find()
            .filter(Column::CourseId.eq(course_id))
            .find_also_related(Students)
            .order_by_desc(Column::Score)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询课程成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(score, student)| {
                let student = student?;
                Some(CourseScoreRecord {
                    student_id: score.student_id,
                    student_name: student.name,
                    major: student.major,
                    score: score.score,
                    date: score.date,
                })
            })
            .collect())
    }

    pub async fn average_score_between_impl(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Option<f64>, i64)> {
        let values: Vec<f64> = Scores::find()
            .filter(Column::Date.gte(start))
            .filter(Column::Date.lt(end))
            .select_only()
            .column(Column::Score)
            .into_tuple::<f64>()
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询成绩失败: {e}")))?;

        let average = crate::analysis::mean(&values).map(round2);
        Ok((average, values.len() as i64))
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::fixtures::date;
    use crate::models::scores::requests::{EnrollRequest, UpsertScoreRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seeded_storage;

    fn score(student_id: &str, course_id: &str, value: f64) -> UpsertScoreRequest {
        UpsertScoreRequest {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            score: value,
            date: date(2025, 1, 10),
        }
    }

    #[actix_web::test]
    async fn test_upsert_keeps_one_row_per_pair() {
        let storage = seeded_storage().await;

        let first = storage.upsert_score(score("20230001", "JCKC001", 70.0)).await.unwrap();
        let second = storage
            .upsert_score(score("20230001", "JCKC001", 88.456))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.score, 88.46);

        let records = storage.list_scores_by_student("20230001").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_name, "高等数学");
        assert_eq!(records[0].credits, 4);
    }

    #[actix_web::test]
    async fn test_upsert_rejects_unknown_course() {
        let storage = seeded_storage().await;
        let err = storage
            .upsert_score(score("20230001", "ZYXX999", 70.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[actix_web::test]
    async fn test_scores_by_course_and_average() {
        let storage = seeded_storage().await;
        storage.upsert_score(score("20230001", "ZYBX001", 70.0)).await.unwrap();
        storage.upsert_score(score("20230002", "ZYBX001", 90.0)).await.unwrap();

        let records = storage.list_scores_by_course("ZYBX001").await.unwrap();
        assert_eq!(records[0].student_name, "李华");
        assert_eq!(records[1].major, "软件工程");

        let (average, count) = storage
            .average_score_between(date(2025, 1, 1), date(2025, 2, 1))
            .await
            .unwrap();
        assert_eq!(average, Some(80.0));
        assert_eq!(count, 2);

        let (average, count) = storage
            .average_score_between(date(2025, 2, 1), date(2025, 3, 1))
            .await
            .unwrap();
        assert_eq!(average, None);
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn test_delete_student_cascades() {
        let storage = seeded_storage().await;
        storage.upsert_score(score("20230001", "JCKC001", 70.0)).await.unwrap();
        storage
            .enroll(EnrollRequest {
                student_id: "20230001".to_string(),
                course_id: "ZYBX001".to_string(),
                enrollment_date: date(2025, 2, 20),
            })
            .await
            .unwrap();

        assert!(storage.delete_student("20230001").await.unwrap());
        assert!(storage.list_scores_by_course("JCKC001").await.unwrap().is_empty());
        assert_eq!(storage.count_enrollments_by_course("ZYBX001").await.unwrap(), 0);
        assert_eq!(storage.count_students().await.unwrap(), 1);
    }
}
