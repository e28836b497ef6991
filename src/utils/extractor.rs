//! 路径参数提取器
//!
//! 在进入业务层之前校验路径参数格式，格式错误时直接返回统一的 JSON 错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use super::validate::{validate_course_id, validate_student_id};
use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, message.clone()));
    InternalError::from_response(message, response).into()
}

fn path_param<'a>(req: &'a HttpRequest, name: &str) -> Result<&'a str, actix_web::Error> {
    req.match_info()
        .get(name)
        .ok_or_else(|| bad_path(format!("缺少路径参数: {name}")))
}

/// `{id}` 形式的正整数 ID
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(path_param(req, "id").and_then(|raw| match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_path(format!("无效的 ID: {raw}"))),
        }))
    }
}

/// `{student_id}` 形式的 8 位学号
#[derive(Debug, Clone)]
pub struct SafeStudentId(pub String);

impl FromRequest for SafeStudentId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(path_param(req, "student_id").and_then(|raw| {
            validate_student_id(raw)
                .map(|_| SafeStudentId(raw.to_string()))
                .map_err(|e| bad_path(format!("无效的学号 {raw}: {e}")))
        }))
    }
}

/// `{course_id}` 形式的课程编号
#[derive(Debug, Clone)]
pub struct SafeCourseId(pub String);

impl FromRequest for SafeCourseId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(path_param(req, "course_id").and_then(|raw| {
            validate_course_id(raw)
                .map(|_| SafeCourseId(raw.to_string()))
                .map_err(|e| bad_path(format!("无效的课程编号 {raw}: {e}")))
        }))
    }
}
