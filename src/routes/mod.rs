pub mod analysis;

pub mod students;

pub mod courses;

pub use analysis::configure_analysis_routes;
pub use courses::configure_courses_routes;
pub use students::configure_students_routes;
