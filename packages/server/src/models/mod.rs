pub mod exam;
pub mod student;
pub mod subject;
