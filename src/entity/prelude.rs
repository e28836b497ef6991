//! 预导入模块，方便使用

pub use super::ai_service_logs::{
    ActiveModel as AiServiceLogActiveModel, Entity as AiServiceLogs, Model as AiServiceLogModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::scores::{ActiveModel as ScoreActiveModel, Entity as Scores, Model as ScoreModel};
pub use super::student_analyses::{
    ActiveModel as StudentAnalysisActiveModel, Entity as StudentAnalyses,
    Model as StudentAnalysisModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
