//! AI 服务调用日志存储操作

use super::SeaOrmStorage;
use crate::analysis::{mean, percent, round2};
use crate::entity::ai_service_logs::{ActiveModel, Column, Entity as AiServiceLogs};
use crate::errors::{GradeSysError, Result};
use crate::models::{
    PaginationInfo,
    service_logs::{
        entities::{AiServiceLog, LogStatus},
        requests::{NewServiceLog, ServiceLogCompletion, ServiceLogListQuery},
        responses::{DailyCount, ServiceLogListResponse, ServiceLogStats},
    },
};
use chrono::{Duration, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 记录一次调用，状态为 processing
    pub async fn create_service_log_impl(&self, req: NewServiceLog) -> Result<AiServiceLog> {
        let model = ActiveModel {
            request_type: Set(req.request_type.as_str().to_string()),
            student_analysis_id: Set(req.student_analysis_id),
            request_prompt: Set(req.request_prompt),
            request_data: Set(serde_json::to_string(&req.request_data)?),
            response_content: Set(None),
            response_time: Set(None),
            status: Set(LogStatus::Processing.as_str().to_string()),
            error_message: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("创建调用日志失败: {e}")))?;

        Ok(result.into_service_log())
    }

    /// 回写调用结果
    pub async fn complete_service_log_impl(
        &self,
        id: i64,
        completion: ServiceLogCompletion,
    ) -> Result<bool> {
        let model = ActiveModel {
            id: Set(id),
            status: Set(completion.status.as_str().to_string()),
            response_content: Set(completion.response_content),
            response_time: Set(Some(completion.response_time)),
            error_message: Set(completion.error_message),
            ..Default::default()
        };

        match model.update(&self.db).await {
            Ok(_) => Ok(true),
            Err(sea_orm::DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(GradeSysError::database_operation(format!(
                "更新调用日志失败: {e}"
            ))),
        }
    }

    pub async fn list_service_logs_with_pagination_impl(
        &self,
        query: ServiceLogListQuery,
    ) -> Result<ServiceLogListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = AiServiceLogs::find();
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询日志总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询日志页数失败: {e}")))?;

        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradeSysError::database_operation(format!("查询日志列表失败: {e}")))?;

        Ok(ServiceLogListResponse {
            items: logs.into_iter().map(|m| m.into_service_log()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 调用统计
    pub async fn service_log_stats_impl(
        &self,
        today: NaiveDate,
        days: i64,
    ) -> Result<ServiceLogStats> {
        let db_err =
            |e: sea_orm::DbErr| GradeSysError::database_operation(format!("统计调用日志失败: {e}"));

        let total = AiServiceLogs::find().count(&self.db).await.map_err(db_err)? as i64;
        let success = AiServiceLogs::find()
            .filter(Column::Status.eq(LogStatus::Success.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)? as i64;

        let response_times: Vec<Option<f64>> = AiServiceLogs::find()
            .filter(Column::Status.eq(LogStatus::Success.as_str()))
            .select_only()
            .column(Column::ResponseTime)
            .into_tuple::<Option<f64>>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let response_times: Vec<f64> = response_times.into_iter().flatten().collect();

        let mut daily_requests = Vec::with_capacity(days.max(0) as usize);
        for offset in (0..days).rev() {
            let date = today - Duration::days(offset);
            let start = day_timestamp(date);
            let end = day_timestamp(date + Duration::days(1));
            let count = AiServiceLogs::find()
                .filter(Column::CreatedAt.gte(start))
                .filter(Column::CreatedAt.lt(end))
                .count(&self.db)
                .await
                .map_err(db_err)? as i64;
            daily_requests.push(DailyCount { date, count });
        }

        Ok(ServiceLogStats {
            total_requests: total,
            success_requests: success,
            success_rate: percent(success, total),
            avg_response_time: round2(mean(&response_times).unwrap_or(0.0)),
            daily_requests,
        })
    }
}

fn day_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::models::service_logs::entities::{LogStatus, RequestType};
    use crate::models::service_logs::requests::{
        NewServiceLog, ServiceLogCompletion, ServiceLogListQuery,
    };
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seeded_storage;

    fn new_log() -> NewServiceLog {
        NewServiceLog {
            request_type: RequestType::Analysis,
            student_analysis_id: None,
            request_prompt: "prompt".to_string(),
            request_data: serde_json::json!({"model": "deepseek-chat"}),
        }
    }

    #[actix_web::test]
    async fn test_log_completion_and_stats() {
        let storage = seeded_storage().await;
        let ok = storage.create_service_log(new_log()).await.unwrap();
        let failed = storage.create_service_log(new_log()).await.unwrap();
        assert_eq!(ok.status, LogStatus::Processing);

        storage
            .complete_service_log(
                ok.id,
                ServiceLogCompletion {
                    status: LogStatus::Success,
                    response_content: Some("# 报告".to_string()),
                    response_time: 1.5,
                    error_message: None,
                },
            )
            .await
            .unwrap();
        storage
            .complete_service_log(
                failed.id,
                ServiceLogCompletion {
                    status: LogStatus::Failed,
                    response_content: None,
                    response_time: 0.3,
                    error_message: Some("timeout".to_string()),
                },
            )
            .await
            .unwrap();

        let today = chrono::Utc::now().date_naive();
        let stats = storage.service_log_stats(today, 7).await.unwrap();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.success_requests, 1);
        assert_eq!(stats.success_rate, 50.0);
        assert_eq!(stats.avg_response_time, 1.5);
        assert_eq!(stats.daily_requests.len(), 7);
        assert_eq!(stats.daily_requests[6].date, today);
        assert_eq!(stats.daily_requests[6].count, 2);

        let page = storage
            .list_service_logs_with_pagination(ServiceLogListQuery {
                status: Some(LogStatus::Failed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].error_message.as_deref(), Some("timeout"));
        assert_eq!(page.pagination.page_size, 20);
    }
}
