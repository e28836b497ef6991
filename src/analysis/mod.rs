//! 成绩分析核心
//!
//! 纯计算模块，不访问数据库。分数段划分、画像收集、提示词渲染、
//! 本地报告生成以及预警规则都在这里实现，服务层负责取数和落库。

pub mod bands;
pub mod input;
pub mod intervention;
pub mod local;
pub mod profile;
pub mod prompt;
pub mod quality;
pub mod statistics;

pub use bands::{
    GradeBand, PerformanceLevel, ScoreDistribution, academic_standing, calculate_gpa,
    grade_points,
};
pub use input::prepare_input_data;
pub use intervention::{AcademicAlert, AlertLevel, InterventionLevel};
pub use local::{GeneratedReport, generate_local_analysis};
pub use profile::{CourseSummary, DataQualityReport, ProfileStatistics, StudentProfile};
pub use quality::{ResponseValidation, estimate_confidence, validate_response};

/// 保留两位小数
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 保留一位小数
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub(crate) fn percent(part: i64, total: i64) -> f64 {
    if total > 0 {
        round1(part as f64 / total as f64 * 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::models::scores::entities::{EnrollmentRecord, ScoreRecord};
    use crate::models::students::entities::{Gender, Student};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn student() -> Student {
        Student {
            student_id: "20230001".to_string(),
            name: "王小明".to_string(),
            gender: Gender::Male,
            birth_date: date(2004, 5, 20),
            major: "软件工程".to_string(),
            college: "计算机学院".to_string(),
        }
    }

    pub fn score(course_id: &str, name: &str, credits: i32, value: f64, on: NaiveDate) -> ScoreRecord {
        ScoreRecord {
            course_id: course_id.to_string(),
            course_name: name.to_string(),
            credits,
            score: value,
            date: on,
        }
    }

    pub fn enrollment(course_id: &str, name: &str, credits: i32, on: NaiveDate) -> EnrollmentRecord {
        EnrollmentRecord {
            course_id: course_id.to_string(),
            course_name: name.to_string(),
            credits,
            enrollment_date: on,
        }
    }
}
