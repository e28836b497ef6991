//! 学生学业画像
//!
//! 汇总一个学生的成绩、课程和选课记录，供本地报告生成和提示词使用。

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{bands::calculate_gpa, mean, round2};
use crate::models::scores::entities::{EnrollmentRecord, ScoreRecord};
use crate::models::students::entities::Student;

const PROMPT_COURSE_LIMIT: usize = 10;
const PROMPT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistics {
    pub total_scores: i64,
    pub average_score: f64,
    pub gpa: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    // 最近 recent_days 天内的平均分
    pub recent_average: Option<f64>,
    pub courses_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
    pub average_score: f64,
    pub score_count: i64,
    pub latest_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student: Student,
    pub statistics: ProfileStatistics,
    // 按日期倒序
    pub scores: Vec<ScoreRecord>,
    // 按最近一次成绩日期倒序
    pub courses: Vec<CourseSummary>,
    pub enrollments: Vec<EnrollmentRecord>,
    pub recent_days: i64,
    pub collected_at: DateTime<Utc>,
}

/// 数据质量检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct DataQualityReport {
    pub is_valid: bool,
    pub completeness_score: f64,
    pub data_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl StudentProfile {
    pub fn collect(
        student: Student,
        mut scores: Vec<ScoreRecord>,
        enrollments: Vec<EnrollmentRecord>,
        now: DateTime<Utc>,
        recent_days: i64,
    ) -> Self {
        scores.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.course_id.cmp(&b.course_id))
        });

        let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
        let courses = summarize_courses(&scores);

        let statistics = if values.is_empty() {
            ProfileStatistics::default()
        } else {
            let cutoff = now.date_naive() - Duration::days(recent_days);
            let recent: Vec<f64> = scores
                .iter()
                .filter(|s| s.date >= cutoff)
                .map(|s| s.score)
                .collect();
            let weighted: Vec<(f64, i32)> = scores.iter().map(|s| (s.score, s.credits)).collect();

            ProfileStatistics {
                total_scores: values.len() as i64,
                average_score: round2(mean(&values).unwrap_or(0.0)),
                gpa: calculate_gpa(&weighted),
                highest_score: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                lowest_score: values.iter().cloned().fold(f64::INFINITY, f64::min),
                recent_average: mean(&recent).map(round2),
                courses_count: courses.len() as i64,
            }
        };

        Self {
            student,
            statistics,
            scores,
            courses,
            enrollments,
            recent_days,
            collected_at: now,
        }
    }

    /// 未取整的平均分，阈值判定用
    pub fn exact_average(&self) -> Option<f64> {
        let values: Vec<f64> = self.scores.iter().map(|s| s.score).collect();
        mean(&values)
    }

    pub fn has_scores(&self) -> bool {
        !self.scores.is_empty()
    }

    /// 最高分与最低分之差
    pub fn score_range(&self) -> f64 {
        if self.has_scores() {
            self.statistics.highest_score - self.statistics.lowest_score
        } else {
            0.0
        }
    }

    /// 转换为提示词中使用的文本块
    pub fn format_for_prompt(&self) -> String {
        let student = &self.student;
        let stats = &self.statistics;
        let mut text = String::new();

        let _ = writeln!(text, "学生信息：");
        let _ = writeln!(text, "- 学号：{}", student.student_id);
        let _ = writeln!(text, "- 姓名：{}", student.name);
        let _ = writeln!(text, "- 性别：{}", student.gender);
        let _ = writeln!(text, "- 学院：{}", student.college);
        let _ = writeln!(text, "- 专业：{}", student.major);
        let _ = writeln!(text);

        let _ = writeln!(text, "学业统计：");
        let _ = writeln!(text, "- 成绩记录数：{}", stats.total_scores);
        let _ = writeln!(text, "- 平均分：{:.2}", stats.average_score);
        let _ = writeln!(text, "- GPA：{:.2}", stats.gpa);
        let _ = writeln!(text, "- 最高分：{:.2}", stats.highest_score);
        let _ = writeln!(text, "- 最低分：{:.2}", stats.lowest_score);
        match stats.recent_average {
            Some(avg) => {
                let _ = writeln!(text, "- 近{}天平均分：{:.2}", self.recent_days, avg);
            }
            None => {
                let _ = writeln!(text, "- 近{}天平均分：暂无", self.recent_days);
            }
        }
        let _ = writeln!(text, "- 课程数：{}", stats.courses_count);
        let _ = writeln!(text);

        let _ = writeln!(text, "课程成绩：");
        for course in self.courses.iter().take(PROMPT_COURSE_LIMIT) {
            let _ = writeln!(
                text,
                "- {}（{}）：{:.2} 分，{} 学分",
                course.course_name, course.course_id, course.average_score, course.credits
            );
        }
        let _ = writeln!(text);

        let _ = writeln!(text, "最近成绩：");
        for score in self.scores.iter().take(PROMPT_RECENT_LIMIT) {
            let _ = writeln!(
                text,
                "- {} {}：{:.2}",
                score.date, score.course_name, score.score
            );
        }

        text
    }

    /// 检查数据是否足以支撑分析
    pub fn validate_quality(&self, now: DateTime<Utc>, window_days: i64) -> DataQualityReport {
        let total = self.scores.len();
        if total == 0 {
            return DataQualityReport {
                is_valid: false,
                completeness_score: 0.0,
                data_issues: vec!["No score records found".to_string()],
                recommendations: vec!["Add score records before requesting an analysis".to_string()],
            };
        }

        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let mut completeness = if total >= 20 {
            1.0
        } else if total >= 10 {
            0.8
        } else if total >= 5 {
            0.6
        } else {
            issues.push(format!("Limited data: only {total} score records"));
            0.4
        };

        let cutoff = now.date_naive() - Duration::days(window_days);
        let recent = self.scores.iter().filter(|s| s.date >= cutoff).count();
        if recent == 0 {
            completeness *= 0.8;
            issues.push(format!("No scores recorded in the last {window_days} days"));
        } else if recent < 3 {
            completeness *= 0.9;
            issues.push(format!(
                "Only {recent} scores recorded in the last {window_days} days"
            ));
        }

        let courses = self.courses.len();
        if courses < 3 {
            completeness *= 0.9;
            issues.push(format!("Scores cover only {courses} courses"));
        }

        if completeness < 0.6 {
            recommendations
                .push("Collect more score records to improve analysis reliability".to_string());
        }
        if recent < 3 {
            recommendations
                .push("Record recent assessments to capture current performance".to_string());
        }
        if courses < 5 {
            recommendations.push("Include more courses for a broader view".to_string());
        }

        DataQualityReport {
            is_valid: true,
            completeness_score: round2(completeness),
            data_issues: issues,
            recommendations,
        }
    }
}

fn summarize_courses(scores: &[ScoreRecord]) -> Vec<CourseSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&ScoreRecord>> = HashMap::new();

    // scores 已按日期倒序，第一次出现即最近一次成绩
    for score in scores {
        let entry = grouped.entry(score.course_id.as_str()).or_default();
        if entry.is_empty() {
            order.push(score.course_id.as_str());
        }
        entry.push(score);
    }

    order
        .into_iter()
        .filter_map(|course_id| {
            let records = grouped.get(course_id)?;
            let first = records.first()?;
            let values: Vec<f64> = records.iter().map(|r| r.score).collect();
            Some(CourseSummary {
                course_id: first.course_id.clone(),
                course_name: first.course_name.clone(),
                credits: first.credits,
                average_score: round2(mean(&values).unwrap_or(0.0)),
                score_count: values.len() as i64,
                latest_score: first.score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{date, enrollment, score, student};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_collect_statistics() {
        let scores = vec![
            score("JCKC001", "高等数学", 4, 92.0, date(2025, 1, 10)),
            score("ZYBX001", "数据结构", 3, 78.0, date(2025, 6, 20)),
            score("ZYXX001", "机器学习", 2, 85.0, date(2025, 6, 10)),
        ];
        let profile = StudentProfile::collect(
            student(),
            scores,
            vec![enrollment("BYSJ001", "毕业设计", 8, date(2025, 3, 1))],
            now(),
            30,
        );

        let stats = &profile.statistics;
        assert_eq!(stats.total_scores, 3);
        assert_eq!(stats.average_score, 85.0);
        assert_eq!(stats.highest_score, 92.0);
        assert_eq!(stats.lowest_score, 78.0);
        assert_eq!(stats.courses_count, 3);
        // 近 30 天：78 与 85
        assert_eq!(stats.recent_average, Some(81.5));
        // (4.0*4 + 3.0*3 + 3.7*2) / 9
        assert_eq!(stats.gpa, 3.6);

        // 按日期倒序
        assert_eq!(profile.scores[0].course_id, "ZYBX001");
        assert_eq!(profile.courses[0].course_id, "ZYBX001");
        assert_eq!(profile.courses[2].latest_score, 92.0);
        assert_eq!(profile.score_range(), 14.0);
    }

    #[test]
    fn test_collect_without_scores() {
        let profile = StudentProfile::collect(student(), vec![], vec![], now(), 30);
        assert!(!profile.has_scores());
        assert_eq!(profile.statistics, ProfileStatistics::default());
        assert_eq!(profile.score_range(), 0.0);
    }

    #[test]
    fn test_format_for_prompt_limits_lists() {
        let scores: Vec<_> = (0..15)
            .map(|i| {
                score(
                    &format!("ZYBX{:03}", i),
                    &format!("课程{i}"),
                    2,
                    70.0 + i as f64,
                    date(2025, 1, 1 + i),
                )
            })
            .collect();
        let profile = StudentProfile::collect(student(), scores, vec![], now(), 30);
        let text = profile.format_for_prompt();

        assert!(text.contains("- 学号：20230001"));
        assert!(text.contains("- 近30天平均分：暂无"));
        assert_eq!(text.matches("学分").count(), 10);
        // 最近的成绩在前
        assert!(text.contains("课程14（ZYBX014）"));
        assert!(!text.contains("课程0（ZYBX000）"));
    }

    #[test]
    fn test_quality_without_scores_is_invalid() {
        let profile = StudentProfile::collect(student(), vec![], vec![], now(), 30);
        let report = profile.validate_quality(now(), 90);
        assert!(!report.is_valid);
        assert_eq!(report.completeness_score, 0.0);
    }

    #[test]
    fn test_quality_penalties() {
        // 2 条成绩，近期只有 1 条，课程不足 3 门
        let scores = vec![
            score("JCKC001", "高等数学", 4, 60.0, date(2024, 1, 10)),
            score("JCKC002", "线性代数", 3, 70.0, date(2025, 6, 1)),
        ];
        let profile = StudentProfile::collect(student(), scores, vec![], now(), 30);
        let report = profile.validate_quality(now(), 90);

        assert!(report.is_valid);
        // 0.4 * 0.9 * 0.9
        assert_eq!(report.completeness_score, 0.32);
        assert_eq!(report.data_issues.len(), 3);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_quality_full_marks() {
        let scores: Vec<_> = (0..20)
            .map(|i| {
                score(
                    &format!("ZYXX{:03}", i),
                    &format!("课程{i}"),
                    2,
                    80.0,
                    date(2025, 6, 1 + i),
                )
            })
            .collect();
        let profile = StudentProfile::collect(student(), scores, vec![], now(), 30);
        let report = profile.validate_quality(now(), 90);

        assert_eq!(report.completeness_score, 1.0);
        assert!(report.data_issues.is_empty());
        assert!(report.recommendations.is_empty());
    }
}
