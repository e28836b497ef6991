use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::services::CourseService;
use crate::utils::SafeCourseId;

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// 课程成绩统计
pub async fn get_statistics(req: HttpRequest, path: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_statistics(&req, &path.0).await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}")
            .wrap(middleware::Compress::default())
            .service(web::resource("/statistics").route(web::get().to(get_statistics))),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};

    use super::*;
    use crate::models::ErrorCode;
    use crate::services::test_support::{json_body, storage_with_scores};

    #[actix_web::test]
    async fn test_course_statistics() {
        let storage = storage_with_scores().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_courses_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/courses/JCKC001/statistics")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["enrolled_count"], 1);
        assert_eq!(body["data"]["scored_count"], 1);
        assert_eq!(body["data"]["pass_count"], 0);

        let req = test::TestRequest::get()
            .uri("/api/v1/courses/ZYXX009/statistics")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(json_body(resp).await["code"], ErrorCode::CourseNotFound as i32);
    }
}
