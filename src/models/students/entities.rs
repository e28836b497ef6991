use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 性别
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "student.ts")]
pub enum Gender {
    #[serde(rename = "男")]
    Male,
    #[serde(rename = "女")]
    Female,
}

impl Gender {
    pub const MALE: &'static str = "男";
    pub const FEMALE: &'static str = "女";
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!("无效的性别: '{s}'. 支持: 男, 女, M, F"))
        })
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "{}", Gender::MALE),
            Gender::Female => write!(f, "{}", Gender::FEMALE),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Gender::MALE | "M" | "m" => Ok(Gender::Male),
            Gender::FEMALE | "F" | "f" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    // 8 位学号
    pub student_id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    // 专业
    pub major: String,
    // 学院
    pub college: String,
}

impl Student {
    /// 截至某日的周岁
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.birth_date.year();
        if (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse() {
        assert_eq!("男".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert!("X".parse::<Gender>().is_err());
        assert_eq!(Gender::Female.to_string(), "女");
    }

    #[test]
    fn test_age_on() {
        let student = Student {
            student_id: "20230001".to_string(),
            name: "张三".to_string(),
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(2003, 9, 1).unwrap(),
            major: "计算机科学与技术".to_string(),
            college: "信息学院".to_string(),
        };
        assert_eq!(student.age_on(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()), 21);
        assert_eq!(student.age_on(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()), 22);
    }
}
