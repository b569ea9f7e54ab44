mod common;
mod exam;
mod student;
