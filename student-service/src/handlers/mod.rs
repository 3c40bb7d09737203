pub mod health;
pub mod students;

pub use health::{health_check, metrics_endpoint, readiness_check, welcome};
pub use students::{
    create_student, delete_student, get_student, list_students, search_students, update_student,
};
