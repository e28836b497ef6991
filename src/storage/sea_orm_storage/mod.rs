//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod analyses;
mod courses;
mod enrollments;
mod scores;
mod service_logs;
mod students;

use crate::config::AppConfig;
use crate::errors::{GradeSysError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置连接数据库并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接，执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradeSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradeSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| GradeSysError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradeSysError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 内存 SQLite，测试使用
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("连接内存数据库失败");
        Self::from_connection(db).await.expect("执行迁移失败")
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, student_id: &str) -> Result<Option<Student>> {
        self.get_student_by_id_impl(student_id).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.list_students_impl().await
    }

    async fn count_students(&self) -> Result<i64> {
        self.count_students_impl().await
    }

    async fn delete_student(&self, student_id: &str) -> Result<bool> {
        self.delete_student_impl(student_id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: &str) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_courses_impl().await
    }

    // 成绩模块
    async fn upsert_score(&self, score: UpsertScoreRequest) -> Result<Score> {
        self.upsert_score_impl(score).await
    }

    async fn list_scores_by_student(&self, student_id: &str) -> Result<Vec<ScoreRecord>> {
        self.list_scores_by_student_impl(student_id).await
    }

    async fn list_scores_by_course(&self, course_id: &str) -> Result<Vec<CourseScoreRecord>> {
        self.list_scores_by_course_impl(course_id).await
    }

    async fn average_score_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Option<f64>, i64)> {
        self.average_score_between_impl(start, end).await
    }

    // 选课模块
    async fn enroll(&self, enrollment: EnrollRequest) -> Result<Enrollment> {
        self.enroll_impl(enrollment).await
    }

    async fn list_enrollments_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<EnrollmentRecord>> {
        self.list_enrollments_by_student_impl(student_id).await
    }

    async fn count_enrollments_by_course(&self, course_id: &str) -> Result<i64> {
        self.count_enrollments_by_course_impl(course_id).await
    }

    // 分析模块
    async fn create_analysis(&self, analysis: NewAnalysis) -> Result<StudentAnalysis> {
        self.create_analysis_impl(analysis).await
    }

    async fn get_analysis_by_id(&self, id: i64) -> Result<Option<StudentAnalysis>> {
        self.get_analysis_by_id_impl(id).await
    }

    async fn update_analysis(
        &self,
        id: i64,
        update: AnalysisUpdate,
    ) -> Result<Option<StudentAnalysis>> {
        self.update_analysis_impl(id, update).await
    }

    async fn find_active_analysis(
        &self,
        student_id: &str,
        analysis_type: AnalysisType,
    ) -> Result<Option<StudentAnalysis>> {
        self.find_active_analysis_impl(student_id, analysis_type)
            .await
    }

    async fn list_analyses_with_pagination(
        &self,
        query: AnalysisListQuery,
    ) -> Result<AnalysisListResponse> {
        self.list_analyses_with_pagination_impl(query).await
    }

    async fn list_student_analyses(
        &self,
        student_id: &str,
        status: Option<AnalysisStatus>,
    ) -> Result<Vec<StudentAnalysis>> {
        self.list_student_analyses_impl(student_id, status).await
    }

    async fn latest_completed_analysis(
        &self,
        student_id: &str,
        analysis_type: Option<AnalysisType>,
    ) -> Result<Option<StudentAnalysis>> {
        self.latest_completed_analysis_impl(student_id, analysis_type)
            .await
    }

    async fn count_analyses_by_status(&self) -> Result<AnalysisCounts> {
        self.count_analyses_by_status_impl().await
    }

    async fn count_analyses_by_type(&self) -> Result<Vec<(AnalysisType, i64)>> {
        self.count_analyses_by_type_impl().await
    }

    async fn list_recent_analyses(&self, limit: u64) -> Result<Vec<StudentAnalysis>> {
        self.list_recent_analyses_impl(limit).await
    }

    async fn list_analyses_matching_result(
        &self,
        markers: &[&str],
        limit: u64,
    ) -> Result<Vec<StudentAnalysis>> {
        self.list_analyses_matching_result_impl(markers, limit)
            .await
    }

    // 服务日志模块
    async fn create_service_log(&self, log: NewServiceLog) -> Result<AiServiceLog> {
        self.create_service_log_impl(log).await
    }

    async fn complete_service_log(
        &self,
        id: i64,
        completion: ServiceLogCompletion,
    ) -> Result<bool> {
        self.complete_service_log_impl(id, completion).await
    }

    async fn list_service_logs_with_pagination(
        &self,
        query: ServiceLogListQuery,
    ) -> Result<ServiceLogListResponse> {
        self.list_service_logs_with_pagination_impl(query).await
    }

    async fn service_log_stats(&self, today: NaiveDate, days: i64) -> Result<ServiceLogStats> {
        self.service_log_stats_impl(today, days).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("gradesys.db").unwrap(),
            "sqlite://gradesys.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://localhost/gradesys").is_ok());

        let err = SeaOrmStorage::build_database_url("oracle://db").unwrap_err();
        assert_eq!(err.code(), "E003");
    }
}
