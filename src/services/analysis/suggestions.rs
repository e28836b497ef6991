use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;
use crate::analysis::intervention::academic_alerts;
use crate::analysis::{AlertLevel, mean, round2};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::analysis::responses::{AlertTotals, StudentAlerts, SuggestionsResponse};
use crate::services::error_response;
use crate::storage::Storage;

pub async fn list_suggestions(
    service: &AnalysisService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match collect_suggestions(storage.as_ref()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取学业建议成功"))),
        Err(e) => Ok(error_response(&e, "获取学业建议失败")),
    }
}

pub(crate) async fn collect_suggestions(storage: &dyn Storage) -> Result<SuggestionsResponse> {
    let mut students = Vec::new();
    let mut totals = AlertTotals::default();

    for student in storage.list_students().await? {
        let mut scores = storage.list_scores_by_student(&student.student_id).await?;
        scores.sort_by(|a, b| b.date.cmp(&a.date));
        let recent: Vec<f64> = scores.iter().map(|s| s.score).collect();

        // 阈值比较使用未取整的平均分
        let Some(average) = mean(&recent) else {
            continue;
        };
        let alerts = academic_alerts(average, &recent);
        if alerts.is_empty() {
            continue;
        }

        // 按学生计数，同一级别的多条预警只算一次
        let has_level = |level: AlertLevel| alerts.iter().any(|a| a.level == level);
        if has_level(AlertLevel::Danger) {
            totals.danger += 1;
        }
        if has_level(AlertLevel::Warning) {
            totals.warning += 1;
        }
        if has_level(AlertLevel::Success) {
            totals.success += 1;
        }

        students.push(StudentAlerts {
            student_id: student.student_id,
            name: student.name,
            major: student.major,
            average_score: round2(average),
            alerts,
        });
    }

    Ok(SuggestionsResponse { students, totals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::date;
    use crate::services::test_support::{add_scores, storage_with_scores};
    use crate::storage::sea_orm_storage::test_support::seeded_storage;

    #[actix_web::test]
    async fn test_average_below_75_gets_warning() {
        let storage = storage_with_scores().await;

        let resp = collect_suggestions(storage.as_ref()).await.unwrap();

        assert_eq!(resp.students.len(), 1);
        assert_eq!(resp.students[0].average_score, 73.5);
        assert_eq!(resp.students[0].alerts[0].level, AlertLevel::Warning);
        assert_eq!(resp.totals.warning, 1);
        assert_eq!(resp.totals.danger, 0);
    }

    #[actix_web::test]
    async fn test_student_with_two_warnings_counted_once() {
        let storage = seeded_storage().await;
        // 平均 66.67 且最近五次明显下降，产生两条 warning
        add_scores(
            &storage,
            "20230001",
            &[
                ("ZYBX001", 100.0, date(2024, 9, 1)),
                ("ZYBX002", 60.0, date(2025, 1, 2)),
                ("ZYBX003", 60.0, date(2025, 1, 3)),
                ("ZYBX004", 60.0, date(2025, 1, 4)),
                ("ZYBX005", 60.0, date(2025, 1, 5)),
                ("ZYBX006", 60.0, date(2025, 1, 6)),
            ],
        )
        .await;

        let resp = collect_suggestions(&storage).await.unwrap();

        assert_eq!(resp.students.len(), 1);
        let warnings = resp.students[0]
            .alerts
            .iter()
            .filter(|a| a.level == AlertLevel::Warning)
            .count();
        assert_eq!(warnings, 2);
        assert_eq!(resp.totals.warning, 1);
        assert_eq!(resp.totals.danger, 0);
    }

    #[actix_web::test]
    async fn test_average_just_below_60_is_danger() {
        let storage = seeded_storage().await;
        add_scores(
            &storage,
            "20230001",
            &[
                ("ZYBX001", 59.99, date(2025, 1, 1)),
                ("ZYBX002", 59.99, date(2025, 1, 2)),
                ("ZYBX003", 60.01, date(2025, 1, 3)),
            ],
        )
        .await;

        let resp = collect_suggestions(&storage).await.unwrap();

        // 展示值取整为 60，但判定使用 59.9967
        assert_eq!(resp.students[0].average_score, 60.0);
        assert_eq!(resp.students[0].alerts[0].level, AlertLevel::Danger);
        assert_eq!(resp.totals.danger, 1);
        assert_eq!(resp.totals.warning, 0);
    }

    #[actix_web::test]
    async fn test_average_just_below_75_and_90() {
        let storage = seeded_storage().await;
        add_scores(
            &storage,
            "20230001",
            &[
                ("ZYBX001", 74.99, date(2025, 1, 1)),
                ("ZYBX002", 74.99, date(2025, 1, 2)),
                ("ZYBX003", 75.01, date(2025, 1, 3)),
            ],
        )
        .await;
        add_scores(
            &storage,
            "20230002",
            &[
                ("ZYBX001", 89.99, date(2025, 1, 1)),
                ("ZYBX002", 89.99, date(2025, 1, 2)),
                ("ZYBX003", 90.01, date(2025, 1, 3)),
            ],
        )
        .await;

        let resp = collect_suggestions(&storage).await.unwrap();

        // 89.9967 不算优秀，没有任何预警
        assert_eq!(resp.students.len(), 1);
        assert_eq!(resp.students[0].student_id, "20230001");
        assert_eq!(resp.students[0].alerts[0].level, AlertLevel::Warning);
        assert_eq!(resp.totals.success, 0);
    }
}
