use serde::Serialize;
use ts_rs::TS;

use crate::analysis::{GradeBand, ScoreDistribution};
use crate::models::courses::entities::{Course, CourseCategory};
use crate::models::scores::entities::{CourseScoreRecord, ScoreRecord};
use crate::models::students::entities::Student;

// 课程类别统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct CategoryStats {
    pub category: CourseCategory,
    pub label: String,
    pub count: i64,
    pub credits: i64,
    pub average_score: Option<f64>,
}

// 最高/最低分对应的课程
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct CourseExtreme {
    pub course_id: String,
    pub course_name: String,
    pub score: f64,
}

// 成绩单
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct TranscriptResponse {
    pub student: Student,
    pub scores: Vec<ScoreRecord>,
    pub total_courses: i64,
    pub total_credits: i64,
    pub average_score: f64,
    pub gpa: f64,
    pub highest: Option<CourseExtreme>,
    pub lowest: Option<CourseExtreme>,
    pub distribution: ScoreDistribution,
    pub categories: Vec<CategoryStats>,
}

// 最高/最低分对应的学生
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct StudentExtreme {
    pub student_id: String,
    pub student_name: String,
    pub score: f64,
}

// 分数段占比
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct BandShare {
    pub band: GradeBand,
    pub label: String,
    pub range: String,
    pub count: i64,
    // 百分比，保留一位小数
    pub percent: f64,
}

// 专业统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct MajorStats {
    pub major: String,
    pub count: i64,
    pub average_score: f64,
    pub pass_rate: f64,
}

// 课程统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct CourseStatisticsResponse {
    pub course: Course,
    pub enrolled_count: i64,
    pub scored_count: i64,
    pub scores: Vec<CourseScoreRecord>,
    pub average_score: f64,
    pub highest: Option<StudentExtreme>,
    pub lowest: Option<StudentExtreme>,
    pub distribution: Vec<BandShare>,
    pub pass_count: i64,
    pub pass_rate: f64,
    pub majors: Vec<MajorStats>,
}
