pub mod students;

pub use students::{CreateStudentRequest, MessageResponse, UpdateStudentRequest};
