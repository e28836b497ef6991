//! 成绩单与课程统计

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use super::bands::{GradeBand, ScoreDistribution, calculate_gpa};
use super::{mean, percent, round2};
use crate::models::courses::entities::{Course, CourseCategory};
use crate::models::reports::responses::{
    BandShare, CategoryStats, CourseExtreme, CourseStatisticsResponse, MajorStats,
    StudentExtreme, TranscriptResponse,
};
use crate::models::scores::entities::{CourseScoreRecord, ScoreRecord};
use crate::models::students::entities::Student;

/// 按课程号排序的成绩单统计
pub fn build_transcript(student: Student, mut scores: Vec<ScoreRecord>) -> TranscriptResponse {
    scores.sort_by(|a, b| a.course_id.cmp(&b.course_id));

    let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
    let weighted: Vec<(f64, i32)> = scores.iter().map(|s| (s.score, s.credits)).collect();

    // 并列时取课程号靠前的一门
    let highest = scores
        .iter()
        .fold(None::<&ScoreRecord>, |best, s| match best {
            Some(b) if b.score >= s.score => Some(b),
            _ => Some(s),
        })
        .map(course_extreme);
    let lowest = scores
        .iter()
        .fold(None::<&ScoreRecord>, |best, s| match best {
            Some(b) if b.score <= s.score => Some(b),
            _ => Some(s),
        })
        .map(course_extreme);

    TranscriptResponse {
        total_courses: scores.len() as i64,
        total_credits: scores.iter().map(|s| s.credits as i64).sum(),
        average_score: round2(mean(&values).unwrap_or(0.0)),
        gpa: calculate_gpa(&weighted),
        highest,
        lowest,
        distribution: ScoreDistribution::from_scores(values.iter().copied()),
        categories: category_stats(&scores),
        student,
        scores,
    }
}

fn course_extreme(score: &ScoreRecord) -> CourseExtreme {
    CourseExtreme {
        course_id: score.course_id.clone(),
        course_name: score.course_name.clone(),
        score: score.score,
    }
}

/// 各课程类别的门数、学分和平均分，省略没有成绩的类别
pub fn category_stats(scores: &[ScoreRecord]) -> Vec<CategoryStats> {
    CourseCategory::ALL
        .iter()
        .filter_map(|&category| {
            let matched: Vec<&ScoreRecord> = scores
                .iter()
                .filter(|s| CourseCategory::from_course_id(&s.course_id) == category)
                .collect();
            if matched.is_empty() {
                return None;
            }
            let values: Vec<f64> = matched.iter().map(|s| s.score).collect();
            Some(CategoryStats {
                category,
                label: category.label().to_string(),
                count: matched.len() as i64,
                credits: matched.iter().map(|s| s.credits as i64).sum(),
                average_score: mean(&values).map(round2),
            })
        })
        .collect()
}

/// 课程成绩统计，成绩按分数倒序
pub fn build_course_statistics(
    course: Course,
    enrolled_count: i64,
    mut scores: Vec<CourseScoreRecord>,
) -> CourseStatisticsResponse {
    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });

    let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
    let total = values.len() as i64;
    let distribution = ScoreDistribution::from_scores(values.iter().copied());

    let bands = GradeBand::ALL
        .iter()
        .map(|&band| {
            let count = distribution.count(band);
            BandShare {
                band,
                label: band.label().to_string(),
                range: band.range().to_string(),
                count,
                percent: percent(count, total),
            }
        })
        .collect();

    let highest = scores.first().map(student_extreme);
    let lowest = scores.last().map(student_extreme);

    CourseStatisticsResponse {
        course,
        enrolled_count,
        scored_count: total,
        average_score: round2(mean(&values).unwrap_or(0.0)),
        highest,
        lowest,
        distribution: bands,
        pass_count: distribution.passed(),
        pass_rate: percent(distribution.passed(), total),
        majors: major_stats(&scores),
        scores,
    }
}

fn student_extreme(score: &CourseScoreRecord) -> StudentExtreme {
    StudentExtreme {
        student_id: score.student_id.clone(),
        student_name: score.student_name.clone(),
        score: score.score,
    }
}

fn major_stats(scores: &[CourseScoreRecord]) -> Vec<MajorStats> {
    let mut grouped: HashMap<&str, Vec<f64>> = HashMap::new();
    for score in scores {
        grouped.entry(score.major.as_str()).or_default().push(score.score);
    }

    let mut stats: Vec<MajorStats> = grouped
        .into_iter()
        .map(|(major, values)| {
            let count = values.len() as i64;
            let passed = values.iter().filter(|v| **v >= 60.0).count() as i64;
            MajorStats {
                major: major.to_string(),
                count,
                average_score: round2(mean(&values).unwrap_or(0.0)),
                pass_rate: percent(passed, count),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.major.cmp(&b.major)));
    stats
}

/// 截至 `today` 所在月份的最近 12 个自然月
///
/// 返回 `(月份标签, 月初, 下月初)`，按时间正序。
pub fn last_12_months(today: NaiveDate) -> Vec<(String, NaiveDate, NaiveDate)> {
    let current = today.year() * 12 + today.month0() as i32;

    (0..12)
        .rev()
        .filter_map(|offset| {
            let index = current - offset;
            let start = month_start(index)?;
            let end = month_start(index + 1)?;
            Some((start.format("%Y-%m").to_string(), start, end))
        })
        .collect()
}

fn month_start(index: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{date, score, student};

    fn course_score(id: &str, name: &str, major: &str, value: f64) -> CourseScoreRecord {
        CourseScoreRecord {
            student_id: id.to_string(),
            student_name: name.to_string(),
            major: major.to_string(),
            score: value,
            date: date(2025, 1, 15),
        }
    }

    #[test]
    fn test_transcript() {
        let scores = vec![
            score("ZYBX001", "数据结构", 3, 91.0, date(2025, 1, 10)),
            score("JCKC001", "高等数学", 4, 58.0, date(2025, 1, 11)),
            score("JCKC002", "大学英语", 2, 91.0, date(2025, 1, 12)),
            score("XXXX001", "选修课", 1, 75.5, date(2025, 1, 13)),
        ];
        let transcript = build_transcript(student(), scores);

        assert_eq!(transcript.scores[0].course_id, "JCKC001");
        assert_eq!(transcript.total_courses, 4);
        assert_eq!(transcript.total_credits, 10);
        assert_eq!(transcript.average_score, 78.88);
        // 并列最高时取课程号靠前的
        assert_eq!(transcript.highest.unwrap().course_id, "JCKC002");
        assert_eq!(transcript.lowest.unwrap().course_name, "高等数学");
        assert_eq!(transcript.distribution.excellent, 2);
        assert_eq!(transcript.distribution.fail, 1);

        let categories: Vec<_> = transcript.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![
                CourseCategory::Basic,
                CourseCategory::MajorRequired,
                CourseCategory::Other
            ]
        );
        assert_eq!(transcript.categories[0].count, 2);
        assert_eq!(transcript.categories[0].credits, 6);
        assert_eq!(transcript.categories[0].average_score, Some(74.5));
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = build_transcript(student(), vec![]);
        assert_eq!(transcript.average_score, 0.0);
        assert!(transcript.highest.is_none());
        assert!(transcript.categories.is_empty());
    }

    #[test]
    fn test_course_statistics() {
        let course = Course {
            course_id: "ZYBX001".to_string(),
            course_name: "数据结构".to_string(),
            credits: 3,
        };
        let scores = vec![
            course_score("20230001", "王小明", "软件工程", 55.0),
            course_score("20230002", "李华", "软件工程", 95.0),
            course_score("20230003", "赵敏", "计算机科学", 82.0),
        ];
        let stats = build_course_statistics(course, 4, scores);

        assert_eq!(stats.enrolled_count, 4);
        assert_eq!(stats.scored_count, 3);
        assert_eq!(stats.scores[0].student_name, "李华");
        assert_eq!(stats.highest.unwrap().score, 95.0);
        assert_eq!(stats.lowest.unwrap().student_id, "20230001");
        assert_eq!(stats.average_score, 77.33);
        assert_eq!(stats.pass_count, 2);
        assert_eq!(stats.pass_rate, 66.7);
        assert_eq!(stats.distribution[0].percent, 33.3);
        assert_eq!(stats.distribution[4].count, 1);

        assert_eq!(stats.majors[0].major, "软件工程");
        assert_eq!(stats.majors[0].count, 2);
        assert_eq!(stats.majors[0].average_score, 75.0);
        assert_eq!(stats.majors[0].pass_rate, 50.0);
    }

    #[test]
    fn test_last_12_months_crosses_year() {
        let months = last_12_months(date(2025, 3, 18));
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].0, "2024-04");
        assert_eq!(months[8].1, date(2024, 12, 1));
        assert_eq!(months[8].2, date(2025, 1, 1));
        assert_eq!(months[11].0, "2025-03");
        assert_eq!(months[11].2, date(2025, 4, 1));
    }
}
