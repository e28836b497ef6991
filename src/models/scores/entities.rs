use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct Score {
    pub id: i64,
    pub student_id: String,
    pub course_id: String,
    // 0-100，保留两位小数
    pub score: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: String,
    pub course_id: String,
    pub enrollment_date: NaiveDate,
}

// 学生视角的成绩记录（附带课程信息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct ScoreRecord {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
    pub score: f64,
    pub date: NaiveDate,
}

// 课程视角的成绩记录（附带学生信息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct CourseScoreRecord {
    pub student_id: String,
    pub student_name: String,
    pub major: String,
    pub score: f64,
    pub date: NaiveDate,
}

// 选课记录（附带课程信息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "score.ts")]
pub struct EnrollmentRecord {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
    pub enrollment_date: NaiveDate,
}
