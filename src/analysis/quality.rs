//! AI 响应质量检查

use serde::{Deserialize, Serialize};

use super::round2;

const MIN_CONTENT_CHARS: usize = 100;
const MAX_CONTENT_CHARS: usize = 10_000;
const REQUIRED_SECTIONS: [&str; 3] = ["总体评估", "分析", "建议"];
const MARKDOWN_MARKERS: [&str; 2] = ["#", "*"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseValidation {
    pub is_valid: bool,
    pub confidence: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// 检查响应的长度、格式和必要章节
pub fn validate_response(content: &str) -> ResponseValidation {
    let mut result = ResponseValidation {
        is_valid: true,
        confidence: 0.8,
        issues: Vec::new(),
        suggestions: Vec::new(),
    };

    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        result.is_valid = false;
        result.issues.push("响应内容过短".to_string());
        result.confidence = 0.2;
    }

    if !MARKDOWN_MARKERS.iter().any(|marker| content.contains(marker)) {
        result.issues.push("缺少 Markdown 格式标记".to_string());
        result.confidence -= 0.1;
    }

    let missing: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !content.contains(section))
        .collect();
    if !missing.is_empty() {
        result
            .issues
            .push(format!("缺少必要章节: {}", missing.join(", ")));
        result.confidence -= 0.2;
    }

    if content.chars().count() > MAX_CONTENT_CHARS {
        result.suggestions.push("响应内容过长，建议精简".to_string());
    }

    result.confidence = round2(result.confidence.max(0.0));
    result
}

/// 按数据量和响应结构估算置信度
///
/// `data_size` 为参与分析的成绩记录数。
pub fn estimate_confidence(content: &str, data_size: usize) -> f64 {
    let mut confidence: f64 = 0.5;

    if data_size > 50 {
        confidence += 0.2;
    } else if data_size > 20 {
        confidence += 0.1;
    } else if data_size < 5 {
        confidence -= 0.2;
    }

    let length = content.chars().count();
    if length > 2000 {
        confidence += 0.1;
    } else if length < 500 {
        confidence -= 0.1;
    }

    if content.contains("# ") && content.contains("## ") {
        confidence += 0.1;
    }

    if content.matches("**").count() > 10 {
        confidence += 0.1;
    }

    round2(confidence.clamp(0.0, 1.0))
}
