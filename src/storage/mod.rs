use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    analysis::{
        entities::{AnalysisStatus, AnalysisType, StudentAnalysis},
        requests::{AnalysisListQuery, AnalysisUpdate, NewAnalysis},
        responses::{AnalysisCounts, AnalysisListResponse},
    },
    courses::{entities::Course, requests::CreateCourseRequest},
    scores::{
        entities::{CourseScoreRecord, Enrollment, EnrollmentRecord, Score, ScoreRecord},
        requests::{EnrollRequest, UpsertScoreRequest},
    },
    service_logs::{
        entities::AiServiceLog,
        requests::{NewServiceLog, ServiceLogCompletion, ServiceLogListQuery},
        responses::{ServiceLogListResponse, ServiceLogStats},
    },
    students::{entities::Student, requests::CreateStudentRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学生
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, student_id: &str) -> Result<Option<Student>>;
    // 按学号排序
    async fn list_students(&self) -> Result<Vec<Student>>;
    async fn count_students(&self) -> Result<i64>;
    // 级联删除成绩、选课和分析记录
    async fn delete_student(&self, student_id: &str) -> Result<bool>;

    /// 课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: &str) -> Result<Option<Course>>;
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// 成绩
    // 同一学生同一课程只保留一条，重复录入覆盖分数和日期
    async fn upsert_score(&self, score: UpsertScoreRequest) -> Result<Score>;
    async fn list_scores_by_student(&self, student_id: &str) -> Result<Vec<ScoreRecord>>;
    async fn list_scores_by_course(&self, course_id: &str) -> Result<Vec<CourseScoreRecord>>;
    // [start, end) 区间内的平均分和成绩条数
    async fn average_score_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Option<f64>, i64)>;

    /// 选课
    // 重复选课返回已有记录
    async fn enroll(&self, enrollment: EnrollRequest) -> Result<Enrollment>;
    async fn list_enrollments_by_student(&self, student_id: &str)
    -> Result<Vec<EnrollmentRecord>>;
    async fn count_enrollments_by_course(&self, course_id: &str) -> Result<i64>;

    /// 分析记录
    async fn create_analysis(&self, analysis: NewAnalysis) -> Result<StudentAnalysis>;
    async fn get_analysis_by_id(&self, id: i64) -> Result<Option<StudentAnalysis>>;
    // 状态变更不合法时返回 InvalidState
    async fn update_analysis(
        &self,
        id: i64,
        update: AnalysisUpdate,
    ) -> Result<Option<StudentAnalysis>>;
    // 该学生同类型的 pending/processing 分析
    async fn find_active_analysis(
        &self,
        student_id: &str,
        analysis_type: AnalysisType,
    ) -> Result<Option<StudentAnalysis>>;
    async fn list_analyses_with_pagination(
        &self,
        query: AnalysisListQuery,
    ) -> Result<AnalysisListResponse>;
    // 按创建时间倒序
    async fn list_student_analyses(
        &self,
        student_id: &str,
        status: Option<AnalysisStatus>,
    ) -> Result<Vec<StudentAnalysis>>;
    async fn latest_completed_analysis(
        &self,
        student_id: &str,
        analysis_type: Option<AnalysisType>,
    ) -> Result<Option<StudentAnalysis>>;
    async fn count_analyses_by_status(&self) -> Result<AnalysisCounts>;
    async fn count_analyses_by_type(&self) -> Result<Vec<(AnalysisType, i64)>>;
    async fn list_recent_analyses(&self, limit: u64) -> Result<Vec<StudentAnalysis>>;
    // 结果中包含任一关键字的已完成分析
    async fn list_analyses_matching_result(
        &self,
        markers: &[&str],
        limit: u64,
    ) -> Result<Vec<StudentAnalysis>>;

    /// AI 服务调用日志
    async fn create_service_log(&self, log: NewServiceLog) -> Result<AiServiceLog>;
    async fn complete_service_log(&self, id: i64, completion: ServiceLogCompletion)
    -> Result<bool>;
    async fn list_service_logs_with_pagination(
        &self,
        query: ServiceLogListQuery,
    ) -> Result<ServiceLogListResponse>;
    // 总量、成功率、平均响应时间，以及截至 today 的最近 days 天每日请求数
    async fn service_log_stats(&self, today: NaiveDate, days: i64) -> Result<ServiceLogStats>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
