pub mod exam;
pub mod health;
pub mod student;
pub mod subject;
