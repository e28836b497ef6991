//! 本地报告生成
//!
//! 不依赖外部服务，根据画像中的统计数据按固定规则拼装 Markdown 报告。

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::bands::{PerformanceLevel, academic_standing};
use super::profile::{CourseSummary, StudentProfile};

const COURSE_BREAKDOWN_LIMIT: usize = 5;
const HIGHLIGHT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub content: String,
    pub confidence: f64,
}

struct Resource {
    title: &'static str,
    url: &'static str,
}

const RESOURCE_GROUPS: &[(&str, &[Resource])] = &[
    (
        "Mathematics Support",
        &[
            Resource {
                title: "Khan Academy Mathematics",
                url: "https://www.youtube.com/user/khanacademy",
            },
            Resource {
                title: "Professor Leonard",
                url: "https://www.youtube.com/user/professorleonard57",
            },
            Resource {
                title: "PatrickJMT",
                url: "https://www.youtube.com/user/patrickJMT",
            },
        ],
    ),
    (
        "Computer Science & Programming",
        &[
            Resource {
                title: "freeCodeCamp.org",
                url: "https://www.youtube.com/c/Freecodecamp",
            },
            Resource {
                title: "CS50",
                url: "https://www.youtube.com/user/cs50",
            },
            Resource {
                title: "The Net Ninja",
                url: "https://www.youtube.com/user/thenetninja",
            },
        ],
    ),
    (
        "General Study Skills",
        &[
            Resource {
                title: "Thomas Frank",
                url: "https://www.youtube.com/user/einfachtom",
            },
            Resource {
                title: "Mariana's Study Corner",
                url: "https://www.youtube.com/c/MarianasStudyCorner",
            },
            Resource {
                title: "Crash Course",
                url: "https://www.youtube.com/c/crashcourse",
            },
        ],
    ),
    (
        "Language Learning",
        &[
            Resource {
                title: "EnglishClass101",
                url: "https://www.youtube.com/user/EnglishClass101",
            },
            Resource {
                title: "BBC Learning English",
                url: "https://www.youtube.com/user/bbclearningenglish",
            },
        ],
    ),
];

/// 生成综合分析报告
pub fn generate_local_analysis(profile: &StudentProfile) -> GeneratedReport {
    let stats = &profile.statistics;
    let average = profile.exact_average().unwrap_or(0.0);
    let confidence = calculate_confidence(profile);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Comprehensive Student Learning Analysis - {}\n",
        profile.student.name
    );

    let _ = writeln!(out, "## Executive Summary");
    let _ = writeln!(
        out,
        "Based on the analysis of {} assessments with an average score of {:.1}, \
         this report provides personalized recommendations for academic improvement.\n",
        stats.total_scores, stats.average_score
    );

    let _ = writeln!(out, "## Academic Performance Analysis\n");
    let _ = writeln!(out, "### Overall Performance");
    let _ = writeln!(out, "- **Average Score**: {:.1}/100", stats.average_score);
    let _ = writeln!(out, "- **GPA**: {:.2}", stats.gpa);
    let _ = writeln!(out, "- **Total Assessments**: {}", stats.total_scores);
    let _ = writeln!(out, "- **Academic Standing**: {}\n", academic_standing(average));

    let _ = writeln!(out, "### Course Performance Breakdown");
    let _ = writeln!(out, "{}", course_breakdown(&profile.courses));

    let _ = writeln!(out, "## Strengths & Opportunities\n");
    let _ = writeln!(out, "### Academic Strengths");
    let _ = writeln!(out, "{}\n", bullet_list(&strengths(&profile.courses, average)));
    let _ = writeln!(out, "### Areas for Improvement");
    let _ = writeln!(
        out,
        "{}\n",
        bullet_list(&improvements(&profile.courses, average))
    );

    out.push_str(LEARNING_STRATEGY);
    out.push_str(INTERVENTION);

    let _ = writeln!(out, "## Recommended Resources\n");
    for (group, resources) in RESOURCE_GROUPS {
        let _ = writeln!(out, "### {group}");
        for resource in *resources {
            let _ = writeln!(out, "- [{}]({})", resource.title, resource.url);
        }
        let _ = writeln!(out);
    }

    out.push_str(DEVELOPMENT_PLAN);

    let _ = writeln!(out, "## Confidence Assessment");
    let _ = writeln!(out, "**Analysis Confidence: {confidence:.1}**\n");
    let _ = writeln!(
        out,
        "This analysis is based on academic data available on {}. \
         Individual learning styles and preferences may require additional personalization.",
        profile.collected_at.format("%Y-%m-%d")
    );

    GeneratedReport {
        content: out.trim().to_string(),
        confidence,
    }
}

const LEARNING_STRATEGY: &str = "## Personalized Learning Strategy

### Study Techniques
- **Active Recall**: Regular self-testing to reinforce learning
- **Spaced Repetition**: Review material at increasing intervals
- **Pomodoro Technique**: 25-minute focused study sessions with breaks
- **Mind Mapping**: Visual organization of complex concepts

### Time Management Recommendations
- Create a weekly study schedule
- Track assignments with a digital calendar
- Break large tasks into smaller, manageable chunks
- Set specific, measurable goals for each study session

";

const INTERVENTION: &str = "## Intervention Recommendations

### For Low-Performance Courses
- Schedule regular meetings with course instructors
- Form study groups with classmates
- Use campus tutoring services
- Review prerequisite material if needed

### General Academic Support
- Visit the academic success center
- Consider peer mentoring programs
- Explore online supplementary resources

";

const DEVELOPMENT_PLAN: &str = "## Future Development Plan

### Short-term Goals (1-2 months)
1. Improve average score by 5-10 points
2. Complete all assignments on time
3. Attend at least one office hour per week for challenging courses

### Mid-term Goals (1 semester)
1. Reach Dean's List level (GPA >= 3.5)
2. Develop effective study habits
3. Build strong relationships with instructors

### Long-term Goals (Academic Year)
1. Maintain consistent academic performance
2. Explore research or internship opportunities
3. Develop professional skills in the major field

";

fn course_breakdown(courses: &[CourseSummary]) -> String {
    if courses.is_empty() {
        return "No course data available for analysis.\n".to_string();
    }

    let mut text = String::new();
    for course in courses.iter().take(COURSE_BREAKDOWN_LIMIT) {
        let _ = writeln!(
            text,
            "- **{}**: {:.1} ({})",
            course.course_name,
            course.average_score,
            PerformanceLevel::from_score(course.average_score)
        );
    }
    text
}

fn course_names<'a>(courses: impl Iterator<Item = &'a CourseSummary>) -> String {
    courses
        .take(HIGHLIGHT_LIMIT)
        .map(|c| c.course_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn strengths(courses: &[CourseSummary], average: f64) -> Vec<String> {
    let mut items = Vec::new();

    let strong = course_names(courses.iter().filter(|c| c.average_score >= 80.0));
    if !strong.is_empty() {
        items.push(format!("Strong performance in: {strong}"));
    }
    if average >= 75.0 {
        items.push("Consistent academic performance across courses".to_string());
    }
    if courses.len() >= 5 {
        items.push("Successfully managing multiple courses simultaneously".to_string());
    }
    if items.is_empty() {
        items.push(
            "Areas of strength will become more apparent with continued academic effort"
                .to_string(),
        );
    }
    items
}

fn improvements(courses: &[CourseSummary], average: f64) -> Vec<String> {
    let mut items = Vec::new();

    let weak = course_names(courses.iter().filter(|c| c.average_score < 70.0));
    if !weak.is_empty() {
        items.push(format!("Focus on improving: {weak}"));
    }
    if average < 80.0 {
        items.push(
            "Overall academic performance could be enhanced with improved study strategies"
                .to_string(),
        );
    }
    items.push("Develop better time management and study planning skills".to_string());
    items
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 数据量、课程覆盖和成绩离散度决定置信度
pub fn calculate_confidence(profile: &StudentProfile) -> f64 {
    let mut confidence: f64 = 0.5;

    let scores = profile.scores.len();
    if scores >= 10 {
        confidence += 0.2;
    } else if scores >= 5 {
        confidence += 0.1;
    }

    let courses = profile.courses.len();
    if courses >= 5 {
        confidence += 0.1;
    } else if courses >= 3 {
        confidence += 0.05;
    }

    if profile.has_scores() && profile.score_range() < 20.0 {
        confidence += 0.1;
    }

    super::round2(confidence.min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{date, score, student};
    use chrono::{TimeZone, Utc};

    fn profile_with(values: &[(&str, &str, f64)]) -> StudentProfile {
        let scores = values
            .iter()
            .enumerate()
            .map(|(i, (id, name, value))| score(id, name, 3, *value, date(2025, 3, 1 + i as u32)))
            .collect();
        StudentProfile::collect(
            student(),
            scores,
            vec![],
            Utc.with_ymd_and_hms(2025, 6, 30, 8, 0, 0).unwrap(),
            30,
        )
    }

    #[test]
    fn test_report_sections() {
        let profile = profile_with(&[
            ("ZYBX001", "数据结构", 92.0),
            ("ZYBX002", "操作系统", 85.0),
            ("JCKC001", "高等数学", 62.0),
        ]);
        let report = generate_local_analysis(&profile);

        for heading in [
            "# Comprehensive Student Learning Analysis - 王小明",
            "## Executive Summary",
            "## Academic Performance Analysis",
            "## Strengths & Opportunities",
            "## Personalized Learning Strategy",
            "## Intervention Recommendations",
            "## Recommended Resources",
            "## Future Development Plan",
            "## Confidence Assessment",
        ] {
            assert!(report.content.contains(heading), "missing {heading}");
        }
        assert!(report.content.contains("- [CS50](https://www.youtube.com/user/cs50)"));
        assert!(report.content.contains("- **高等数学**: 62.0 (Needs Improvement)"));
        assert!(report.content.contains("Strong performance in: 操作系统, 数据结构"));
        assert!(report.content.contains("Focus on improving: 高等数学"));
        // 平均 79.67
        assert!(report.content.contains("Satisfactory - Meets Expectations"));
        assert!(report.content.contains("Overall academic performance could be enhanced"));
        assert!(report.content.contains("2025-06-30"));
    }

    #[test]
    fn test_fallback_strength_sentence() {
        let profile = profile_with(&[("JCKC001", "高等数学", 50.0)]);
        let report = generate_local_analysis(&profile);
        assert!(report.content.contains("Areas of strength will become more apparent"));
        assert!(report.content.contains("At Risk - Immediate Attention Required"));
    }

    #[test]
    fn test_standing_uses_unrounded_average() {
        // 平均 89.9967，展示为 90.0 但仍属于良好
        let profile = profile_with(&[
            ("ZYBX001", "数据结构", 89.99),
            ("ZYBX002", "操作系统", 89.99),
            ("ZYBX003", "计算机网络", 90.01),
        ]);
        let report = generate_local_analysis(&profile);
        assert_eq!(profile.statistics.average_score, 90.0);
        assert!(report.content.contains("- **Average Score**: 90.0/100"));
        assert!(!report.content.contains("Academic Standing**: Excellent"));

        let profile = profile_with(&[
            ("JCKC001", "高等数学", 59.99),
            ("JCKC002", "线性代数", 59.99),
            ("JCKC003", "概率论", 60.01),
        ]);
        let report = generate_local_analysis(&profile);
        assert!(report.content.contains("At Risk - Immediate Attention Required"));
    }

    #[test]
    fn test_empty_profile_still_renders() {
        let profile = profile_with(&[]);
        let report = generate_local_analysis(&profile);
        assert!(report.content.contains("No course data available for analysis."));
        assert_eq!(report.confidence, 0.5);
    }

    #[test]
    fn test_confidence_rules() {
        // 3 门课程且分差小于 20：0.5 + 0.05 + 0.1
        let narrow = profile_with(&[
            ("ZYBX001", "数据结构", 80.0),
            ("ZYBX002", "操作系统", 85.0),
            ("ZYBX003", "计算机网络", 90.0),
        ]);
        assert_eq!(calculate_confidence(&narrow), 0.65);

        let many: Vec<(String, String, f64)> = (0..12)
            .map(|i| (format!("ZYXX{:03}", i), format!("课程{i}"), 50.0 + i as f64 * 4.0))
            .collect();
        let refs: Vec<(&str, &str, f64)> = many
            .iter()
            .map(|(id, name, v)| (id.as_str(), name.as_str(), *v))
            .collect();
        // 12 条成绩、12 门课程、分差 44：0.5 + 0.2 + 0.1
        assert_eq!(calculate_confidence(&profile_with(&refs)), 0.8);
    }
}
