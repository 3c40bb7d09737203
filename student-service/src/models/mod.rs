pub mod student;

pub use student::{
    is_searchable_fragment, parse_student_id, NewStudent, Student, StudentDocument, StudentUpdate,
};
