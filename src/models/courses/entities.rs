use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    // 课程编号，如 JCKC001
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
}

impl Course {
    pub fn category(&self) -> CourseCategory {
        CourseCategory::from_course_id(&self.course_id)
    }
}

// 课程类别（由课程编号前缀决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "course.ts")]
pub enum CourseCategory {
    Basic,         // JCKC
    MajorRequired, // ZYBX
    MajorElective, // ZYXX
    Graduation,    // BYSJ
    Other,
}

impl CourseCategory {
    pub const ALL: [CourseCategory; 5] = [
        CourseCategory::Basic,
        CourseCategory::MajorRequired,
        CourseCategory::MajorElective,
        CourseCategory::Graduation,
        CourseCategory::Other,
    ];

    pub fn from_course_id(course_id: &str) -> Self {
        if course_id.starts_with("JCKC") {
            Self::Basic
        } else if course_id.starts_with("ZYBX") {
            Self::MajorRequired
        } else if course_id.starts_with("ZYXX") {
            Self::MajorElective
        } else if course_id.starts_with("BYSJ") {
            Self::Graduation
        } else {
            Self::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "基础课程",
            Self::MajorRequired => "专业必修",
            Self::MajorElective => "专业选修",
            Self::Graduation => "毕业设计",
            Self::Other => "其他课程",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_prefix() {
        assert_eq!(CourseCategory::from_course_id("JCKC001"), CourseCategory::Basic);
        assert_eq!(
            CourseCategory::from_course_id("ZYBX1024"),
            CourseCategory::MajorRequired
        );
        assert_eq!(
            CourseCategory::from_course_id("ZYXX003"),
            CourseCategory::MajorElective
        );
        assert_eq!(CourseCategory::from_course_id("BYSJ001"), CourseCategory::Graduation);
        assert_eq!(CourseCategory::from_course_id("MAT101"), CourseCategory::Other);
    }
}
