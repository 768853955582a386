pub mod account;
pub mod course;
pub mod notice;
pub mod score;
pub mod sea_orm_active_enums;
pub mod student;
