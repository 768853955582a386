pub mod auth;
pub mod courses;
pub mod grades;
pub mod health;
pub mod notices;
pub mod profile;
pub mod reports;
pub mod stats;
pub mod students;
pub mod transcripts;
