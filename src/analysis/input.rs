//! 按分析类型准备输入数据
//!
//! 生成的 JSON 会落库到 `input_data`，同时作为提示词变量来源。

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use serde_json::{Map, Value, json};

use super::bands::{PerformanceLevel, ScoreDistribution};
use super::{mean, percent, round1, round2};
use crate::models::analysis::entities::AnalysisType;
use crate::models::scores::entities::{EnrollmentRecord, ScoreRecord};
use crate::models::students::entities::Student;

const IMPROVEMENT_WINDOW_DAYS: i64 = 90;
const TREND_THRESHOLD: f64 = 5.0;

pub fn prepare_input_data(
    student: &Student,
    scores: &[ScoreRecord],
    enrollments: &[EnrollmentRecord],
    analysis_type: AnalysisType,
    today: NaiveDate,
) -> Value {
    let mut data = base_data(student, scores, enrollments);

    match analysis_type {
        AnalysisType::AcademicPerformance => academic_performance(&mut data, scores),
        AnalysisType::LearningProgress => learning_progress(&mut data, scores, enrollments),
        AnalysisType::StrengthWeakness => strength_weakness(&mut data, scores),
        AnalysisType::ImprovementSuggestions => improvement(&mut data, scores, today),
        AnalysisType::Comprehensive => {
            academic_performance(&mut data, scores);
            learning_progress(&mut data, scores, enrollments);
            strength_weakness(&mut data, scores);
            improvement(&mut data, scores, today);
            data.insert("age".into(), json!(student.age_on(today)));
            enrollment_summary(&mut data, scores, enrollments);
        }
    }

    Value::Object(data)
}

fn base_data(
    student: &Student,
    scores: &[ScoreRecord],
    enrollments: &[EnrollmentRecord],
) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("student_id".into(), json!(student.student_id));
    data.insert("student_name".into(), json!(student.name));
    data.insert("gender".into(), json!(student.gender.to_string()));
    data.insert("major".into(), json!(student.major));
    data.insert("college".into(), json!(student.college));
    data.insert("birth_date".into(), json!(student.birth_date.to_string()));

    if scores.is_empty() {
        return data;
    }

    let values: Vec<f64> = scores.iter().map(|s| s.score).collect();

    // 已出成绩和已选课程的并集
    let mut credits_by_course: BTreeMap<&str, i32> = BTreeMap::new();
    for score in scores {
        credits_by_course.insert(score.course_id.as_str(), score.credits);
    }
    for enrollment in enrollments {
        credits_by_course
            .entry(enrollment.course_id.as_str())
            .or_insert(enrollment.credits);
    }

    data.insert(
        "average_score".into(),
        json!(round2(mean(&values).unwrap_or(0.0))),
    );
    data.insert(
        "max_score".into(),
        json!(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)),
    );
    data.insert(
        "min_score".into(),
        json!(values.iter().cloned().fold(f64::INFINITY, f64::min)),
    );
    data.insert(
        "total_credits".into(),
        json!(credits_by_course.values().map(|c| *c as i64).sum::<i64>()),
    );
    data.insert("course_count".into(), json!(credits_by_course.len()));
    data
}

fn sorted_by_date(scores: &[ScoreRecord]) -> Vec<&ScoreRecord> {
    let mut sorted: Vec<&ScoreRecord> = scores.iter().collect();
    sorted.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.course_id.cmp(&b.course_id))
    });
    sorted
}

fn score_row(score: &ScoreRecord) -> Value {
    json!({
        "course_id": score.course_id,
        "course_name": score.course_name,
        "score": score.score,
        "credits": score.credits,
        "date": score.date.to_string(),
    })
}

fn academic_performance(data: &mut Map<String, Value>, scores: &[ScoreRecord]) {
    let distribution = ScoreDistribution::from_scores(scores.iter().map(|s| s.score));
    data.insert("score_distribution".into(), json!(distribution));
    data.insert(
        "detailed_scores".into(),
        Value::Array(sorted_by_date(scores).into_iter().map(score_row).collect()),
    );
}

fn learning_progress(
    data: &mut Map<String, Value>,
    scores: &[ScoreRecord],
    enrollments: &[EnrollmentRecord],
) {
    let sorted = sorted_by_date(scores);

    let mut running_total = 0.0;
    let trend: Vec<Value> = sorted
        .iter()
        .enumerate()
        .map(|(index, score)| {
            running_total += score.score;
            json!({
                "date": score.date.to_string(),
                "course_name": score.course_name,
                "score": score.score,
                "cumulative_average": round2(running_total / (index + 1) as f64),
            })
        })
        .collect();

    let completed: HashSet<&str> = scores.iter().map(|s| s.course_id.as_str()).collect();
    let mut all_courses = completed.clone();
    all_courses.extend(enrollments.iter().map(|e| e.course_id.as_str()));

    let time_period = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => format!("{} 到 {}", first.date, last.date),
        _ => "N/A".to_string(),
    };

    data.insert("progress_trend".into(), Value::Array(trend));
    data.insert("completed_courses".into(), json!(completed.len()));
    data.insert("total_courses".into(), json!(all_courses.len()));
    data.insert(
        "completion_rate".into(),
        json!(percent(completed.len() as i64, all_courses.len() as i64)),
    );
    data.insert("time_period".into(), json!(time_period));
}

fn strength_weakness(data: &mut Map<String, Value>, scores: &[ScoreRecord]) {
    let mut ranked: Vec<&ScoreRecord> = scores.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.course_id.cmp(&b.course_id))
    });

    // 前后各 20%，至少 1 门
    let take = (ranked.len() / 5).max(1).min(ranked.len());
    let subject = |s: &&ScoreRecord| json!({"course_name": s.course_name, "score": s.score});

    let strong: Vec<Value> = ranked.iter().take(take).map(subject).collect();
    let weak: Vec<Value> = ranked.iter().rev().take(take).map(subject).collect();

    data.insert("strong_subjects".into(), Value::Array(strong));
    data.insert("weak_subjects".into(), Value::Array(weak));
    data.insert(
        "course_details".into(),
        Value::Array(ranked.into_iter().map(score_row).collect()),
    );
}

fn improvement(data: &mut Map<String, Value>, scores: &[ScoreRecord], today: NaiveDate) {
    let cutoff = today - Duration::days(IMPROVEMENT_WINDOW_DAYS);
    let recent: Vec<f64> = scores
        .iter()
        .filter(|s| s.date >= cutoff)
        .map(|s| s.score)
        .collect();
    let older: Vec<f64> = scores
        .iter()
        .filter(|s| s.date < cutoff)
        .map(|s| s.score)
        .collect();

    let recent_average = mean(&recent);
    let previous_average = mean(&older);
    let trend = match (recent_average, previous_average) {
        (Some(recent), Some(previous)) if recent - previous > TREND_THRESHOLD => "improving",
        (Some(recent), Some(previous)) if recent - previous < -TREND_THRESHOLD => "declining",
        _ => "stable",
    };

    let total = scores.len() as i64;
    let failed = scores.iter().filter(|s| s.score < 60.0).count() as i64;
    let excellent = scores.iter().filter(|s| s.score >= 90.0).count() as i64;

    let mut issues = Vec::new();
    if trend == "declining" {
        issues.push("近期成绩呈下降趋势");
    }
    if total > 0 && failed as f64 / total as f64 > 0.2 {
        issues.push("挂科率较高");
    }
    if total < 10 {
        issues.push("课程数量偏少");
    }

    let course_load = if total > 15 {
        "heavy"
    } else if total < 8 {
        "light"
    } else {
        "normal"
    };

    let average = mean(&scores.iter().map(|s| s.score).collect::<Vec<_>>());
    let academic_status = average
        .map(|avg| PerformanceLevel::from_score(avg).label())
        .unwrap_or("N/A");

    data.insert("recent_average".into(), json!(recent_average.map(round2)));
    data.insert("previous_average".into(), json!(previous_average.map(round2)));
    data.insert("trend".into(), json!(trend));
    data.insert("improvement_areas".into(), json!(issues));
    data.insert("failed_count".into(), json!(failed));
    data.insert("excellent_count".into(), json!(excellent));
    data.insert("course_load".into(), json!(course_load));
    data.insert("academic_status".into(), json!(academic_status));
}

fn enrollment_summary(
    data: &mut Map<String, Value>,
    scores: &[ScoreRecord],
    enrollments: &[EnrollmentRecord],
) {
    let scored: HashSet<&str> = scores.iter().map(|s| s.course_id.as_str()).collect();
    let total = enrollments.len() as i64;
    let active = enrollments
        .iter()
        .filter(|e| !scored.contains(e.course_id.as_str()))
        .count() as i64;
    let completion = if total > 0 {
        round1((total - active) as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    data.insert(
        "enrollment_summary".into(),
        json!({
            "total_enrolled": total,
            "active_courses": active,
            "completion_rate": format!("{completion:.1}%"),
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{date, enrollment, score, student};

    fn sample_scores() -> Vec<ScoreRecord> {
        vec![
            score("JCKC001", "高等数学", 4, 55.0, date(2024, 12, 20)),
            score("JCKC002", "大学英语", 2, 65.0, date(2025, 1, 5)),
            score("ZYBX001", "数据结构", 3, 80.0, date(2025, 5, 10)),
            score("ZYBX002", "操作系统", 3, 88.0, date(2025, 6, 1)),
            score("ZYXX001", "机器学习", 2, 95.0, date(2025, 6, 15)),
        ]
    }

    #[test]
    fn test_base_data_uses_course_union() {
        let enrollments = vec![
            enrollment("ZYBX001", "数据结构", 3, date(2025, 2, 20)),
            enrollment("BYSJ001", "毕业设计", 8, date(2025, 2, 20)),
        ];
        let data = prepare_input_data(
            &student(),
            &sample_scores(),
            &enrollments,
            AnalysisType::AcademicPerformance,
            date(2025, 6, 30),
        );

        assert_eq!(data["student_name"], "王小明");
        assert_eq!(data["average_score"], 76.6);
        assert_eq!(data["max_score"], 95.0);
        assert_eq!(data["min_score"], 55.0);
        assert_eq!(data["course_count"], 6);
        assert_eq!(data["total_credits"], 22);
        assert_eq!(data["score_distribution"]["fail"], 1);
        assert_eq!(data["detailed_scores"][0]["course_id"], "JCKC001");
        assert!(data.get("progress_trend").is_none());
    }

    #[test]
    fn test_base_data_without_scores() {
        let data = prepare_input_data(
            &student(),
            &[],
            &[],
            AnalysisType::StrengthWeakness,
            date(2025, 6, 30),
        );
        assert!(data.get("average_score").is_none());
        assert_eq!(data["strong_subjects"], json!([]));
    }

    #[test]
    fn test_learning_progress() {
        let enrollments = vec![enrollment("BYSJ001", "毕业设计", 8, date(2025, 2, 20))];
        let data = prepare_input_data(
            &student(),
            &sample_scores(),
            &enrollments,
            AnalysisType::LearningProgress,
            date(2025, 6, 30),
        );

        assert_eq!(data["progress_trend"][1]["cumulative_average"], 60.0);
        assert_eq!(data["completed_courses"], 5);
        assert_eq!(data["total_courses"], 6);
        assert_eq!(data["completion_rate"], 83.3);
        assert_eq!(data["time_period"], "2024-12-20 到 2025-06-15");
    }

    #[test]
    fn test_strength_weakness_takes_at_least_one() {
        let data = prepare_input_data(
            &student(),
            &sample_scores(),
            &[],
            AnalysisType::StrengthWeakness,
            date(2025, 6, 30),
        );
        assert_eq!(data["strong_subjects"].as_array().unwrap().len(), 1);
        assert_eq!(data["strong_subjects"][0]["course_name"], "机器学习");
        assert_eq!(data["weak_subjects"][0]["course_name"], "高等数学");
    }

    #[test]
    fn test_improvement_trend() {
        let data = prepare_input_data(
            &student(),
            &sample_scores(),
            &[],
            AnalysisType::ImprovementSuggestions,
            date(2025, 6, 30),
        );
        // 近 90 天 (80 + 88 + 95) / 3 = 87.67，之前 (55 + 65) / 2 = 60
        assert_eq!(data["recent_average"], 87.67);
        assert_eq!(data["previous_average"], 60.0);
        assert_eq!(data["trend"], "improving");
        assert_eq!(data["failed_count"], 1);
        assert_eq!(data["course_load"], "light");
        assert_eq!(data["improvement_areas"], json!(["课程数量偏少"]));
        assert_eq!(data["academic_status"], "Satisfactory");
    }

    #[test]
    fn test_comprehensive_merges_sections() {
        let enrollments = vec![
            enrollment("ZYBX001", "数据结构", 3, date(2025, 2, 20)),
            enrollment("BYSJ001", "毕业设计", 8, date(2025, 2, 20)),
        ];
        let data = prepare_input_data(
            &student(),
            &sample_scores(),
            &enrollments,
            AnalysisType::Comprehensive,
            date(2025, 6, 30),
        );

        for key in [
            "score_distribution",
            "progress_trend",
            "strong_subjects",
            "trend",
            "enrollment_summary",
        ] {
            assert!(data.get(key).is_some(), "missing {key}");
        }
        assert_eq!(data["age"], 21);
        assert_eq!(data["enrollment_summary"]["total_enrolled"], 2);
        assert_eq!(data["enrollment_summary"]["active_courses"], 1);
        assert_eq!(data["enrollment_summary"]["completion_rate"], "50.0%");
    }
}
