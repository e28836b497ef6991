//! 演示数据
//!
//! 数据库中没有学生时写入一批课程、学生、成绩和选课记录。
//! 每个学生按水平档位在对应分数区间内随机生成成绩。

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::analysis::round2;
use crate::errors::{GradeSysError, Result};
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::scores::requests::{EnrollRequest, UpsertScoreRequest};
use crate::models::students::{entities::Gender, requests::CreateStudentRequest};
use crate::storage::Storage;

const DEMO_COURSES: &[(&str, &str, i32)] = &[
    ("JCKC001", "高等数学", 4),
    ("JCKC002", "线性代数", 3),
    ("JCKC003", "大学英语", 2),
    ("JCKC004", "大学物理", 4),
    ("ZYBX001", "数据结构", 4),
    ("ZYBX002", "计算机网络", 3),
    ("ZYBX003", "操作系统", 4),
    ("ZYBX004", "数据库原理", 3),
    ("ZYXX001", "人工智能导论", 2),
    ("ZYXX002", "编译原理", 3),
    ("ZYXX003", "计算机图形学", 2),
    ("BYSJ001", "毕业设计", 6),
];

#[derive(Debug, Clone, Copy)]
enum DemoLevel {
    Excellent,
    Good,
    Average,
    Struggling,
}

impl DemoLevel {
    fn score_range(&self) -> (f64, f64) {
        match self {
            DemoLevel::Excellent => (88.0, 98.0),
            DemoLevel::Good => (78.0, 90.0),
            DemoLevel::Average => (65.0, 82.0),
            DemoLevel::Struggling => (45.0, 70.0),
        }
    }
}

struct DemoStudent {
    student_id: &'static str,
    name: &'static str,
    gender: Gender,
    birth: (i32, u32, u32),
    major: &'static str,
    level: DemoLevel,
}

const DEMO_STUDENTS: &[DemoStudent] = &[
    DemoStudent {
        student_id: "20210001",
        name: "王小明",
        gender: Gender::Male,
        birth: (2003, 5, 15),
        major: "计算机科学与技术",
        level: DemoLevel::Excellent,
    },
    DemoStudent {
        student_id: "20210002",
        name: "张丽华",
        gender: Gender::Female,
        birth: (2003, 8, 22),
        major: "软件工程",
        level: DemoLevel::Excellent,
    },
    DemoStudent {
        student_id: "20220001",
        name: "赵文静",
        gender: Gender::Female,
        birth: (2004, 2, 18),
        major: "软件工程",
        level: DemoLevel::Good,
    },
    DemoStudent {
        student_id: "20230017",
        name: "张三",
        gender: Gender::Male,
        birth: (2004, 3, 15),
        major: "计算机科学与技术",
        level: DemoLevel::Good,
    },
    DemoStudent {
        student_id: "20230018",
        name: "李四",
        gender: Gender::Female,
        birth: (2004, 7, 22),
        major: "软件工程",
        level: DemoLevel::Average,
    },
    DemoStudent {
        student_id: "20230019",
        name: "王五",
        gender: Gender::Male,
        birth: (2004, 11, 8),
        major: "人工智能",
        level: DemoLevel::Average,
    },
    DemoStudent {
        student_id: "20230020",
        name: "赵六",
        gender: Gender::Female,
        birth: (2004, 5, 18),
        major: "数据科学",
        level: DemoLevel::Struggling,
    },
    DemoStudent {
        student_id: "20230021",
        name: "陈七",
        gender: Gender::Male,
        birth: (2004, 9, 12),
        major: "网络工程",
        level: DemoLevel::Struggling,
    },
];

const DEMO_COLLEGE: &str = "信息工程学院";
// 成绩日期分布在最近这么多天内
const SCORE_SPAN_DAYS: i64 = 300;

/// 写入演示数据，数据库已有学生时跳过并返回 false
pub async fn seed_demo_data(storage: &dyn Storage) -> Result<bool> {
    let existing = storage.count_students().await?;
    if existing > 0 {
        debug!(
            "Database already has {} student(s), skipping demo data",
            existing
        );
        return Ok(false);
    }

    info!("No students found in database, seeding demo data...");
    let today = Utc::now().date_naive();

    for &(course_id, course_name, credits) in DEMO_COURSES {
        let request = CreateCourseRequest {
            course_id: course_id.to_string(),
            course_name: course_name.to_string(),
            credits,
        };
        request.validate().map_err(GradeSysError::validation)?;
        storage.create_course(request).await?;
    }

    let mut score_count = 0usize;
    for demo in DEMO_STUDENTS {
        let (y, m, d) = demo.birth;
        let birth_date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| GradeSysError::date_parse(format!("无效的出生日期: {y}-{m}-{d}")))?;
        let request = CreateStudentRequest {
            student_id: demo.student_id.to_string(),
            name: demo.name.to_string(),
            gender: demo.gender,
            birth_date,
            major: demo.major.to_string(),
            college: DEMO_COLLEGE.to_string(),
        };
        request.validate().map_err(GradeSysError::validation)?;
        storage.create_student(request).await?;

        for request in demo_scores(demo, today) {
            if let Err(e) = request.validate() {
                warn!("Skipping invalid demo score for {}: {}", demo.student_id, e);
                continue;
            }
            storage
                .enroll(EnrollRequest {
                    student_id: request.student_id.clone(),
                    course_id: request.course_id.clone(),
                    enrollment_date: request.date - Duration::days(120),
                })
                .await?;
            storage.upsert_score(request).await?;
            score_count += 1;
        }

        // 毕业设计只选课，不出成绩
        storage
            .enroll(EnrollRequest {
                student_id: demo.student_id.to_string(),
                course_id: "BYSJ001".to_string(),
                enrollment_date: today - Duration::days(30),
            })
            .await?;
    }

    info!(
        "Demo data created: {} courses, {} students, {} scores",
        DEMO_COURSES.len(),
        DEMO_STUDENTS.len(),
        score_count
    );
    Ok(true)
}

fn demo_scores(demo: &DemoStudent, today: NaiveDate) -> Vec<UpsertScoreRequest> {
    let mut rng = rand::rng();
    let (low, high) = demo.level.score_range();
    let graded: Vec<_> = DEMO_COURSES
        .iter()
        .filter(|(course_id, _, _)| !course_id.starts_with("BYSJ"))
        .collect();
    let take = rng.random_range(8..=graded.len());

    graded
        .into_iter()
        .take(take)
        .map(|&(course_id, _, _)| UpsertScoreRequest {
            student_id: demo.student_id.to_string(),
            course_id: course_id.to_string(),
            score: round2(rng.random_range(low..=high)),
            date: today - Duration::days(rng.random_range(0..SCORE_SPAN_DAYS)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[actix_web::test]
    async fn test_seed_only_once() {
        let storage = SeaOrmStorage::in_memory().await;

        assert!(seed_demo_data(&storage).await.unwrap());
        assert_eq!(
            storage.count_students().await.unwrap(),
            DEMO_STUDENTS.len() as i64
        );
        assert_eq!(storage.list_courses().await.unwrap().len(), DEMO_COURSES.len());

        let scores = storage.list_scores_by_student("20230020").await.unwrap();
        assert!(scores.len() >= 8);
        assert!(scores.iter().all(|s| (45.0..=70.0).contains(&s.score)));
        assert_eq!(storage.count_enrollments_by_course("BYSJ001").await.unwrap(), 8);

        assert!(!seed_demo_data(&storage).await.unwrap());
    }
}
