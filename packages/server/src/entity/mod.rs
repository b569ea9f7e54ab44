pub mod exam_detail;
pub mod exam_master;
pub mod student;
pub mod subject;
