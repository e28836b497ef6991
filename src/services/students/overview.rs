use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::analysis::statistics::category_stats;
use crate::analysis::{ScoreDistribution, mean, round2};
use crate::models::ApiResponse;
use crate::models::analysis::entities::AnalysisStatus;
use crate::models::analysis::responses::{AnalysisHistoryItem, StudentAnalysisOverview};
use crate::services::error_response;

pub async fn get_overview(
    service: &StudentService,
    request: &HttpRequest,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let records = match service.load_records(storage.as_ref(), student_id).await {
        Ok(records) => records,
        Err(resp) => return Ok(resp),
    };

    let analyses = match storage
        .list_student_analyses(student_id, Some(AnalysisStatus::Completed))
        .await
    {
        Ok(analyses) => analyses,
        Err(e) => return Ok(error_response(&e, "获取分析记录失败")),
    };

    let values = records.score_values();
    let overview = StudentAnalysisOverview {
        analyses: analyses.iter().map(AnalysisHistoryItem::from).collect(),
        total_courses: values.len() as i64,
        average_score: round2(mean(&values).unwrap_or(0.0)),
        failed_courses: values.iter().filter(|v| **v < 60.0).count() as i64,
        excellent_courses: values.iter().filter(|v| **v >= 90.0).count() as i64,
        distribution: ScoreDistribution::from_scores(values.iter().copied()),
        categories: category_stats(&records.scores),
        student: records.student,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(overview, "获取学生分析概览成功")))
}
