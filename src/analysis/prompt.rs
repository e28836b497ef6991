//! 提示词模板
//!
//! 模板中的 `{name}` 占位符由输入数据渲染，缺少变量时返回错误。

use std::collections::HashMap;
use std::fmt::Write as _;

use serde_json::Value;

use super::bands::{GradeBand, ScoreDistribution};
use super::profile::StudentProfile;
use crate::errors::{GradeSysError, Result};
use crate::models::analysis::entities::AnalysisType;

pub const SYSTEM_PROMPT: &str = "你是一位专业的教育数据分析师，擅长根据学生的成绩数据给出客观、具体、可执行的学业分析和建议。请使用 Markdown 格式输出，包含清晰的标题层级。";

const ACADEMIC_PERFORMANCE_TEMPLATE: &str = r#"请对以下学生进行学业表现分析。

## 学生基本信息
- 姓名：{student_name}（{student_id}）
- 学院/专业：{college} / {major}

## 成绩概况
- 平均分：{average_score}
- 最高分：{max_score}
- 最低分：{min_score}
- 课程数：{course_count}，总学分：{total_credits}

## 分数段分布
{score_distribution_text}

## 各科成绩
{academic_data}

请按以下结构输出：
1. 总体评估
2. 各科表现分析
3. 提升建议
"#;

const LEARNING_PROGRESS_TEMPLATE: &str = r#"请分析以下学生的学习进度。

## 学生基本信息
- 姓名：{student_name}（{student_id}）
- 专业：{major}

## 进度数据
- 统计区间：{time_period}
- 已完成课程：{completed_courses} / {total_courses}
- 完成率：{completion_rate}%

## 成绩变化轨迹
{progress_data}

请按以下结构输出：
1. 总体评估
2. 学习进度与趋势分析
3. 后续学习建议
"#;

const STRENGTH_WEAKNESS_TEMPLATE: &str = r#"请分析以下学生的优势与劣势科目。

## 学生基本信息
- 姓名：{student_name}（{student_id}）
- 专业：{major}
- 平均分：{average_score}

## 优势科目
{strong_subjects_text}

## 薄弱科目
{weak_subjects_text}

## 全部课程
{course_completion_data}

请按以下结构输出：
1. 总体评估
2. 优势与劣势分析
3. 针对性建议
"#;

const IMPROVEMENT_SUGGESTIONS_TEMPLATE: &str = r#"请为以下学生制定学业改进建议。

## 学生基本信息
- 姓名：{student_name}（{student_id}）
- 专业：{major}
- 当前学业状态：{academic_status}

## 改进相关数据
- 平均分：{average_score}
- 近期平均分：{recent_average_text}
- 此前平均分：{previous_average_text}
- 成绩趋势：{trend}
- 不及格课程数：{failed_count}
- 优秀课程数：{excellent_count}
- 课程负担：{course_load}

## 需要关注的问题
{improvement_areas_text}

请按以下结构输出：
1. 总体评估
2. 问题分析
3. 具体改进建议（含时间安排）
"#;

const COMPREHENSIVE_TEMPLATE: &str = r#"请对以下学生进行全面的综合分析。

## 学生基本信息
- 姓名：{student_name}（{student_id}），{gender}，{age} 岁
- 学院/专业：{college} / {major}

## 成绩概况
- 平均分：{average_score}，最高分：{max_score}，最低分：{min_score}
- 课程数：{course_count}，总学分：{total_credits}
- 学业状态：{academic_status}，成绩趋势：{trend}

## 分数段分布
{score_distribution_text}

## 各科成绩
{academic_data}

## 成绩变化轨迹
{progress_data}

## 优势科目
{strong_subjects_text}

## 薄弱科目
{weak_subjects_text}

## 需要关注的问题
{improvement_areas_text}

请按以下结构输出：
1. 总体评估
2. 学业表现分析
3. 优势与不足分析
4. 改进建议与发展规划
"#;

const AGENT_TEMPLATE: &str = r#"请基于以下学生数据生成一份完整的学业分析报告。

{student_summary}

报告需要包含：
# 学业综合分析报告
## 总体评估
## 学业表现分析
## 优势与待提升领域
## 个性化学习策略
## 干预建议
## 推荐学习资源
## 未来发展规划

要求：结论必须基于数据，建议具体可执行。
"#;

pub fn template_for(analysis_type: AnalysisType) -> &'static str {
    match analysis_type {
        AnalysisType::AcademicPerformance => ACADEMIC_PERFORMANCE_TEMPLATE,
        AnalysisType::LearningProgress => LEARNING_PROGRESS_TEMPLATE,
        AnalysisType::StrengthWeakness => STRENGTH_WEAKNESS_TEMPLATE,
        AnalysisType::ImprovementSuggestions => IMPROVEMENT_SUGGESTIONS_TEMPLATE,
        AnalysisType::Comprehensive => COMPREHENSIVE_TEMPLATE,
    }
}

pub fn agent_template() -> &'static str {
    AGENT_TEMPLATE
}

/// 替换模板中的 `{name}` 占位符
///
/// 占位符名只允许字母、数字和下划线，其他花括号内容原样保留。
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) if is_placeholder(&after[..end]) => {
                let name = &after[..end];
                let value = vars.get(name).ok_or_else(|| {
                    GradeSysError::template(format!("模板变量缺失: {name}"))
                })?;
                output.push_str(value);
                rest = &after[end + 1..];
            }
            _ => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);

    Ok(output)
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// 按分析类型渲染提示词
pub fn build_prompt(analysis_type: AnalysisType, input: &Value) -> Result<String> {
    render_template(template_for(analysis_type), &prompt_variables(input))
}

/// 综合智能体分析使用的提示词
pub fn comprehensive_agent_prompt(profile: &StudentProfile) -> Result<String> {
    let mut vars = HashMap::new();
    vars.insert("student_summary".to_string(), profile.format_for_prompt());
    render_template(AGENT_TEMPLATE, &vars)
}

/// 从输入数据中提取模板变量
pub fn prompt_variables(input: &Value) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    if let Some(object) = input.as_object() {
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "暂无".to_string(),
                other => other.to_string(),
            };
            vars.insert(key.clone(), text);
        }
    }

    let score_rows = input
        .get("detailed_scores")
        .or_else(|| input.get("course_details"));
    vars.insert("academic_data".to_string(), format_score_table(score_rows));
    vars.insert(
        "progress_data".to_string(),
        format_progress_table(input.get("progress_trend")),
    );
    vars.insert(
        "course_completion_data".to_string(),
        format_course_table(input.get("course_details")),
    );
    vars.insert(
        "score_distribution_text".to_string(),
        format_distribution(input.get("score_distribution")),
    );
    vars.insert(
        "strong_subjects_text".to_string(),
        format_subject_list(input.get("strong_subjects")),
    );
    vars.insert(
        "weak_subjects_text".to_string(),
        format_subject_list(input.get("weak_subjects")),
    );
    vars.insert(
        "improvement_areas_text".to_string(),
        format_issue_list(input.get("improvement_areas")),
    );
    vars.insert(
        "recent_average_text".to_string(),
        format_optional_number(input.get("recent_average")),
    );
    vars.insert(
        "previous_average_text".to_string(),
        format_optional_number(input.get("previous_average")),
    );

    vars
}

fn rows(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "-".to_string(),
    }
}

fn format_score_table(value: Option<&Value>) -> String {
    let rows = rows(value);
    if rows.is_empty() {
        return "暂无成绩数据".to_string();
    }

    let mut table = String::from("| 课程 | 课程号 | 成绩 | 学分 | 日期 |\n|---|---|---|---|---|\n");
    for row in rows {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} |",
            text(row, "course_name"),
            text(row, "course_id"),
            text(row, "score"),
            text(row, "credits"),
            text(row, "date"),
        );
    }
    table
}

fn format_progress_table(value: Option<&Value>) -> String {
    let rows = rows(value);
    if rows.is_empty() {
        return "暂无进度数据".to_string();
    }

    let mut table = String::from("| 日期 | 课程 | 成绩 | 累计平均 |\n|---|---|---|---|\n");
    for row in rows {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} |",
            text(row, "date"),
            text(row, "course_name"),
            text(row, "score"),
            text(row, "cumulative_average"),
        );
    }
    table
}

fn format_course_table(value: Option<&Value>) -> String {
    let rows = rows(value);
    if rows.is_empty() {
        return "暂无课程数据".to_string();
    }

    let mut table = String::from("| 课程 | 成绩 | 等级 |\n|---|---|---|\n");
    for row in rows {
        let band = row
            .get("score")
            .and_then(Value::as_f64)
            .map(|score| GradeBand::from_score(score).label())
            .unwrap_or("-");
        let _ = writeln!(
            table,
            "| {} | {} | {} |",
            text(row, "course_name"),
            text(row, "score"),
            band,
        );
    }
    table
}

fn format_distribution(value: Option<&Value>) -> String {
    let Some(distribution) = value
        .cloned()
        .and_then(|v| serde_json::from_value::<ScoreDistribution>(v).ok())
    else {
        return "暂无成绩数据".to_string();
    };

    GradeBand::ALL
        .iter()
        .map(|band| {
            format!(
                "- {}（{}）：{} 门",
                band.label(),
                band.range(),
                distribution.count(*band)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_subject_list(value: Option<&Value>) -> String {
    let rows = rows(value);
    if rows.is_empty() {
        return "暂无课程数据".to_string();
    }
    rows.iter()
        .map(|row| format!("- {}：{}", text(row, "course_name"), text(row, "score")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_issue_list(value: Option<&Value>) -> String {
    let rows = rows(value);
    if rows.is_empty() {
        return "- 暂无明显问题".to_string();
    }
    rows.iter()
        .filter_map(Value::as_str)
        .map(|issue| format!("- {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_optional_number(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(|n| format!("{n:.2}"))
        .unwrap_or_else(|| "暂无".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{date, score, student};
    use crate::analysis::input::prepare_input_data;

    #[test]
    fn test_render_template_substitutes_and_keeps_literals() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "张三".to_string());
        let rendered = render_template("你好 {name}，{ 不是变量 } {}", &vars).unwrap();
        assert_eq!(rendered, "你好 张三，{ 不是变量 } {}");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let err = render_template("平均分 {average_score}", &HashMap::new()).unwrap_err();
        assert_eq!(err.code(), "E012");
        assert!(err.message().contains("average_score"));
    }

    #[test]
    fn test_every_template_renders_with_prepared_input() {
        let scores = vec![
            score("JCKC001", "高等数学", 4, 58.0, date(2025, 1, 10)),
            score("ZYBX001", "数据结构", 3, 91.0, date(2025, 6, 10)),
        ];
        for analysis_type in AnalysisType::ALL {
            let input =
                prepare_input_data(&student(), &scores, &[], analysis_type, date(2025, 6, 30));
            let prompt = build_prompt(analysis_type, &input)
                .unwrap_or_else(|e| panic!("{analysis_type} failed: {e}"));
            assert!(prompt.contains("王小明"));
            assert!(prompt.contains("总体评估"));
            assert!(!prompt.contains("{student_name}"));
        }
    }

    #[test]
    fn test_tables_fall_back_when_empty() {
        let vars = prompt_variables(&serde_json::json!({"student_name": "李四"}));
        assert_eq!(vars["academic_data"], "暂无成绩数据");
        assert_eq!(vars["progress_data"], "暂无进度数据");
        assert_eq!(vars["course_completion_data"], "暂无课程数据");
        assert_eq!(vars["recent_average_text"], "暂无");
    }

    #[test]
    fn test_comprehensive_agent_prompt_embeds_profile() {
        use chrono::TimeZone;

        let now = chrono::Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap();
        let profile = StudentProfile::collect(
            student(),
            vec![score("ZYBX001", "数据结构", 3, 91.0, date(2025, 6, 10))],
            vec![],
            now,
            30,
        );
        let prompt = comprehensive_agent_prompt(&profile).unwrap();
        assert!(prompt.contains("- 姓名：王小明"));
        assert!(prompt.contains("## 干预建议"));
    }

    #[test]
    fn test_score_table_rows() {
        let input = serde_json::json!({
            "detailed_scores": [
                {"course_id": "JCKC001", "course_name": "高等数学", "score": 88.5, "credits": 4, "date": "2025-01-10"}
            ]
        });
        let vars = prompt_variables(&input);
        assert!(vars["academic_data"].contains("| 高等数学 | JCKC001 | 88.5 | 4 | 2025-01-10 |"));
    }
}
