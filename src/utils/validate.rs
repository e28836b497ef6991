use once_cell::sync::Lazy;
use regex::Regex;

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}$").expect("Invalid student id regex"));

static COURSE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3,4}\d{3,4}$").expect("Invalid course id regex"));

pub fn validate_student_id(student_id: &str) -> Result<(), &'static str> {
    // 学号必须为 8 位数字
    if !STUDENT_ID_RE.is_match(student_id) {
        return Err("Student ID must be exactly 8 digits");
    }
    Ok(())
}

pub fn validate_course_id(course_id: &str) -> Result<(), &'static str> {
    // 课程编号：3-4 位大写字母 + 3-4 位数字
    if !COURSE_ID_RE.is_match(course_id) {
        return Err("Course ID must be 3-4 uppercase letters followed by 3-4 digits");
    }
    Ok(())
}

pub fn validate_person_name(name: &str) -> Result<(), &'static str> {
    let length = name.trim().chars().count();
    if length == 0 || length > 20 {
        return Err("Name length must be between 1 and 20 characters");
    }
    Ok(())
}

pub fn validate_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err("Score must be between 0 and 100");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id() {
        assert!(validate_student_id("20230001").is_ok());
        assert!(validate_student_id("2023001").is_err());
        assert!(validate_student_id("2023000a").is_err());
        assert!(validate_student_id("202300011").is_err());
    }

    #[test]
    fn test_course_id() {
        assert!(validate_course_id("JCKC001").is_ok());
        assert!(validate_course_id("CS1024").is_err());
        assert!(validate_course_id("MAT101").is_ok());
        assert!(validate_course_id("jckc001").is_err());
        assert!(validate_course_id("ZYBX12345").is_err());
    }

    #[test]
    fn test_person_name() {
        assert!(validate_person_name("李四").is_ok());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_person_name(&"名".repeat(21)).is_err());
    }

    #[test]
    fn test_score_range() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(100.0).is_ok());
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }
}
