pub mod students;
pub mod teachers;
