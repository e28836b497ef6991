//! 学生分析存储操作

use super::SeaOrmStorage;
use crate::entity::student_analyses::{ActiveModel, Column, Entity as StudentAnalyses};
use crate::errors::{GradeSysError, Result};
use crate::models::{
    PaginationInfo,
    analysis::{
        entities::{AnalysisStatus, AnalysisType, StudentAnalysis},
        requests::{AnalysisListQuery, AnalysisUpdate, NewAnalysis},
        responses::{AnalysisCounts, AnalysisListResponse},
    },
};
use crate::utils::contains_literal;
use chrono::{Duration, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

const ALL_STATUSES: [AnalysisStatus; 4] = [
    AnalysisStatus::Pending,
    AnalysisStatus::Processing,
    AnalysisStatus::Completed,
    AnalysisStatus::Failed,
];

// 创建时默认记录的分析方
const DEFAULT_ANALYZER: &str = "DeepSeek AI";

fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

impl SeaOrmStorage {
    /// 创建待处理的分析记录
    pub async fn create_analysis_impl(&self, req: NewAnalysis) -> Result<StudentAnalysis> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            analysis_type: Set(req.analysis_type.as_str().to_string()),
            title: Set(req.title),
            status: Set(AnalysisStatus::Pending.as_str().to_string()),
            input_data: Set(serde_json::to_string(&req.input_data)?),
            analysis_result: Set(None),
            ai_confidence: Set(None),
            prompt_template: Set(req.prompt_template),
            actual_prompt: Set(None),
            analyzed_by: Set(DEFAULT_ANALYZER.to_string()),
            error_message: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            analyzed_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("创建分析记录失败: {e}")))?;

        Ok(result.into_analysis())
    }

    pub async fn get_analysis_by_id_impl(&self, id: i64) -> Result<Option<StudentAnalysis>> {
        let result = StudentAnalyses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询分析记录失败: {e}")))?;

        Ok(result.map(|m| m.into_analysis()))
    }

    /// 更新分析记录
    ///
    /// 状态只能按 pending → processing → completed/failed 流转，
    /// 首次进入 completed 时写入 analyzed_at。写入以读取时的状态为条件，
    /// 状态已被其他请求改变时返回 InvalidState。
    pub async fn update_analysis_impl(
        &self,
        id: i64,
        update: AnalysisUpdate,
    ) -> Result<Option<StudentAnalysis>> {
        let Some(current) = StudentAnalyses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询分析记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let current_status: AnalysisStatus = current
            .status
            .parse()
            .map_err(GradeSysError::invalid_state)?;
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(next) = update.status {
            if !current_status.can_transition_to(next) {
                return Err(GradeSysError::invalid_state(format!(
                    "分析 {id} 不能从 {current_status} 变更为 {next}"
                )));
            }
            model.status = Set(next.as_str().to_string());
            if next == AnalysisStatus::Completed && current.analyzed_at.is_none() {
                model.analyzed_at = Set(Some(now));
            }
        }

        if let Some(result) = update.analysis_result {
            model.analysis_result = Set(Some(result));
        }
        if let Some(confidence) = update.ai_confidence {
            model.ai_confidence = Set(Some(confidence.clamp(0.0, 1.0)));
        }
        if let Some(prompt) = update.actual_prompt {
            model.actual_prompt = Set(Some(prompt));
        }
        if let Some(analyzed_by) = update.analyzed_by {
            model.analyzed_by = Set(analyzed_by);
        }
        if let Some(error) = update.error_message {
            model.error_message = Set(Some(error));
        }

        let result = StudentAnalyses::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(current.status))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("更新分析记录失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(GradeSysError::invalid_state(format!(
                "分析 {id} 的状态已被其他请求修改"
            )));
        }

        self.get_analysis_by_id_impl(id).await
    }

    pub async fn find_active_analysis_impl(
        &self,
        student_id: &str,
        analysis_type: AnalysisType,
    ) -> Result<Option<StudentAnalysis>> {
        let result = StudentAnalyses::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AnalysisType.eq(analysis_type.as_str()))
            .filter(Column::Status.is_in([
                AnalysisStatus::Pending.as_str(),
                AnalysisStatus::Processing.as_str(),
            ]))
            .order_by_desc(Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询进行中的分析失败: {e}")))?;

        Ok(result.map(|m| m.into_analysis()))
    }

    /// 分页查询分析历史
    pub async fn list_analyses_with_pagination_impl(
        &self,
        query: AnalysisListQuery,
    ) -> Result<AnalysisListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = StudentAnalyses::find();

        // 学号模糊匹配
        if let Some(ref student_id) = query.student_id
            && !student_id.trim().is_empty()
        {
            select = select.filter(Column::StudentId.like(contains_literal(student_id.trim())));
        }

        if let Some(analysis_type) = query.analysis_type {
            select = select.filter(Column::AnalysisType.eq(analysis_type.as_str()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(date_from) = query.date_from {
            select = select.filter(Column::CreatedAt.gte(day_start(date_from)));
        }

        // 包含 date_to 当天
        if let Some(date_to) = query.date_to {
            select = select.filter(Column::CreatedAt.lt(day_start(date_to + Duration::days(1))));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询分析总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询分析页数失败: {e}")))?;

        let analyses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询分析列表失败: {e}")))?;

        Ok(AnalysisListResponse {
            items: analyses.into_iter().map(|m| m.into_analysis()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
            status_counts: self.count_analyses_by_status_impl().await?,
        })
    }

    pub async fn list_student_analyses_impl(
        &self,
        student_id: &str,
        status: Option<AnalysisStatus>,
    ) -> Result<Vec<StudentAnalysis>> {
        let mut select = StudentAnalyses::find().filter(Column::StudentId.eq(student_id));
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let analyses = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询学生分析失败: {e}")))?;

        Ok(analyses.into_iter().map(|m| m.into_analysis()).collect())
    }

    pub async fn latest_completed_analysis_impl(
        &self,
        student_id: &str,
        analysis_type: Option<AnalysisType>,
    ) -> Result<Option<StudentAnalysis>> {
        let mut select = StudentAnalyses::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(AnalysisStatus::Completed.as_str()));
        if let Some(analysis_type) = analysis_type {
            select = select.filter(Column::AnalysisType.eq(analysis_type.as_str()));
        }

        let result = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询最新分析失败: {e}")))?;

        Ok(result.map(|m| m.into_analysis()))
    }

    pub async fn count_analyses_by_status_impl(&self) -> Result<AnalysisCounts> {
        let mut counts = AnalysisCounts::default();
        for status in ALL_STATUSES {
            let count = StudentAnalyses::find()
                .filter(Column::Status.eq(status.as_str()))
                .count(&self.db)
                .await
                .map_err(|e| {
                    GradeSysError::database_operation(format!("统计分析状态失败: {e}"))
                })?;
            counts.record(status, count as i64);
        }
        Ok(counts)
    }

    pub async fn count_analyses_by_type_impl(&self) -> Result<Vec<(AnalysisType, i64)>> {
        let mut counts = Vec::with_capacity(AnalysisType::ALL.len());
        for analysis_type in AnalysisType::ALL {
            let count = StudentAnalyses::find()
                .filter(Column::AnalysisType.eq(analysis_type.as_str()))
                .count(&self.db)
                .await
                .map_err(|e| {
                    GradeSysError::database_operation(format!("统计分析类型失败: {e}"))
                })?;
            counts.push((analysis_type, count as i64));
        }
        Ok(counts)
    }

    pub async fn list_recent_analyses_impl(&self, limit: u64) -> Result<Vec<StudentAnalysis>> {
        let analyses = StudentAnalyses::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询最近分析失败: {e}")))?;

        Ok(analyses.into_iter().map(|m| m.into_analysis()).collect())
    }

    /// 报告内容包含任一关键字的已完成分析
    pub async fn list_analyses_matching_result_impl(
        &self,
        markers: &[&str],
        limit: u64,
    ) -> Result<Vec<StudentAnalysis>> {
        if markers.is_empty() {
            return Ok(Vec::new());
        }

        let condition = markers.iter().fold(Condition::any(), |cond, marker| {
            cond.add(Column::AnalysisResult.like(contains_literal(marker)))
        });

        let analyses = StudentAnalyses::find()
            .filter(Column::Status.eq(AnalysisStatus::Completed.as_str()))
            .filter(condition)
            .order_by_desc(Column::AnalyzedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询分析失败: {e}")))?;

        Ok(analyses.into_iter().map(|m| m.into_analysis()).collect())
    }
}
