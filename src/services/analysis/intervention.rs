use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;
use crate::analysis::intervention::intervention_recommendations;
use crate::analysis::{InterventionLevel, mean, percent, round2};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::analysis::responses::{
    AnalysisHistoryItem, InterventionResponse, InterventionStudent, InterventionTotals,
};
use crate::services::error_response;
use crate::storage::Storage;

pub async fn list_interventions(
    service: &AnalysisService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match collect_interventions(storage.as_ref()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取干预名单成功"))),
        Err(e) => Ok(error_response(&e, "获取干预名单失败")),
    }
}

pub(crate) async fn collect_interventions(storage: &dyn Storage) -> Result<InterventionResponse> {
    let mut students = Vec::new();
    let mut totals = InterventionTotals::default();

    for student in storage.list_students().await? {
        let scores = storage.list_scores_by_student(&student.student_id).await?;
        let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
        // 没有成绩的学生无法评估；分级使用未取整的平均分
        let Some(average) = mean(&values) else {
            continue;
        };

        let total_courses = values.len() as i64;
        let failed_count = values.iter().filter(|v| **v < 60.0).count() as i64;
        let Some(level) = InterventionLevel::assess(average, failed_count) else {
            continue;
        };

        match level {
            InterventionLevel::Critical => totals.critical += 1,
            InterventionLevel::Warning => totals.warning += 1,
            InterventionLevel::Attention => totals.attention += 1,
        }

        let latest_analysis = storage
            .latest_completed_analysis(&student.student_id, None)
            .await?
            .as_ref()
            .map(AnalysisHistoryItem::from);

        students.push(InterventionStudent {
            recommendations: intervention_recommendations(average, failed_count),
            pass_rate: percent(total_courses - failed_count, total_courses),
            student_id: student.student_id,
            name: student.name,
            major: student.major,
            average_score: round2(average),
            failed_count,
            total_courses,
            level,
            latest_analysis,
        });
    }

    students.sort_by(|a, b| {
        a.average_score
            .total_cmp(&b.average_score)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });

    Ok(InterventionResponse { students, totals })
}
