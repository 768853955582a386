pub mod account_repository;
pub mod course_repository;
pub mod notice_repository;
pub mod report_repository;
pub mod score_repository;
pub mod student_repository;

pub use account_repository::AccountRepository;
pub use course_repository::{CourseRepository, CourseUpdate};
pub use notice_repository::NoticeRepository;
pub use report_repository::ReportRepository;
pub use score_repository::ScoreRepository;
pub use student_repository::{NewStudent, StudentFilter, StudentRepository, StudentUpdate};
