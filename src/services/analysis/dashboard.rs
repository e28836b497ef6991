use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::AnalysisService;
use crate::analysis::{round2, statistics::last_12_months};
use crate::cache::{ObjectCache, get_json, insert_json};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::analysis::entities::StudentAnalysis;
use crate::models::analysis::responses::{
    DashboardResponse, FlaggedAnalysis, MonthlyAverage, TypeCount,
};
use crate::services::error_response;
use crate::storage::Storage;

pub(crate) const DASHBOARD_CACHE_KEY: &str = "analysis:dashboard";

const RECENT_LIMIT: u64 = 10;
const FLAGGED_LIMIT: u64 = 10;
const SERVICE_STATS_DAYS: i64 = 7;

// 报告中的学业状态行
const PROBLEM_MARKERS: &[&str] = &[
    "Academic Standing**: At Risk",
    "Academic Standing**: Needs Improvement",
];
const EXCELLENT_MARKERS: &[&str] = &["Academic Standing**: Excellent"];

pub async fn get_dashboard(
    service: &AnalysisService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if let Some(cache) = &cache
        && let Some(cached) = get_json::<DashboardResponse>(cache.as_ref(), DASHBOARD_CACHE_KEY).await
    {
        debug!("Dashboard served from cache");
        return Ok(HttpResponse::Ok().json(ApiResponse::success(cached, "获取仪表盘数据成功")));
    }

    let storage = service.get_storage(request);
    match build_dashboard(storage.as_ref(), Utc::now().date_naive()).await {
        Ok(dashboard) => {
            if let Some(cache) = &cache {
                insert_json(cache.as_ref(), DASHBOARD_CACHE_KEY, &dashboard, 0).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard, "获取仪表盘数据成功")))
        }
        Err(e) => Ok(error_response(&e, "获取仪表盘数据失败")),
    }
}

/// 分析状态变化后清除仪表盘缓存
pub(crate) async fn invalidate_dashboard(cache: Option<Arc<dyn ObjectCache>>) {
    if let Some(cache) = cache {
        cache.remove(DASHBOARD_CACHE_KEY).await;
    }
}

pub(crate) async fn build_dashboard(
    storage: &dyn Storage,
    today: NaiveDate,
) -> Result<DashboardResponse> {
    let total_students = storage.count_students().await?;
    let counts = storage.count_analyses_by_status().await?;

    let type_distribution = storage
        .count_analyses_by_type()
        .await?
        .into_iter()
        .map(|(analysis_type, count)| TypeCount {
            analysis_type,
            type_name: analysis_type.display_name().to_string(),
            count,
        })
        .collect();

    let recent_analyses = storage.list_recent_analyses(RECENT_LIMIT).await?;
    let problem_students = flagged(
        storage
            .list_analyses_matching_result(PROBLEM_MARKERS, FLAGGED_LIMIT)
            .await?,
    );
    let excellent_students = flagged(
        storage
            .list_analyses_matching_result(EXCELLENT_MARKERS, FLAGGED_LIMIT)
            .await?,
    );

    let service_stats = storage.service_log_stats(today, SERVICE_STATS_DAYS).await?;

    let mut performance_trend = Vec::with_capacity(12);
    for (month, start, end) in last_12_months(today) {
        let (average, score_count) = storage.average_score_between(start, end).await?;
        performance_trend.push(MonthlyAverage {
            month,
            average_score: average.map(round2),
            score_count,
        });
    }

    Ok(DashboardResponse {
        total_students,
        total_analyses: counts.total,
        pending_analyses: counts.pending,
        processing_analyses: counts.processing,
        completed_analyses: counts.completed,
        failed_analyses: counts.failed,
        type_distribution,
        recent_analyses,
        problem_students,
        excellent_students,
        service_stats,
        performance_trend,
    })
}

fn flagged(analyses: Vec<StudentAnalysis>) -> Vec<FlaggedAnalysis> {
    analyses
        .into_iter()
        .map(|a| FlaggedAnalysis {
            analysis_id: a.id,
            student_id: a.student_id,
            title: a.title,
            analyzed_at: a.analyzed_at,
        })
        .collect()
}
