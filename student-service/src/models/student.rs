use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A student record as exposed on the wire, with the store id rendered as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "assignedQuestions", default)]
    pub assigned_questions: String,
}

/// Fields for a record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub assigned_questions: String,
}

/// Full-replace update: `assigned_questions` is always written, `name` only when given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub assigned_questions: String,
}

/// Persisted layout in the `students` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "assignedQuestions", default)]
    pub assigned_questions: String,
}

impl StudentDocument {
    pub fn new(student: NewStudent) -> Self {
        Self {
            id: ObjectId::new(),
            name: student.name,
            assigned_questions: student.assigned_questions,
        }
    }
}

impl From<StudentDocument> for Student {
    fn from(doc: StudentDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            assigned_questions: doc.assigned_questions,
        }
    }
}

/// Parses a wire id into an `ObjectId`; malformed ids resolve to `None`.
pub fn parse_student_id(id: &str) -> Option<ObjectId> {
    match ObjectId::parse_str(id) {
        Ok(oid) => Some(oid),
        Err(e) => {
            tracing::debug!(id = %id, error = %e, "Ignoring malformed student id");
            None
        }
    }
}

/// Whether a name-search fragment can be expressed as a store query. Fragments
/// with an embedded NUL match nothing.
pub fn is_searchable_fragment(fragment: &str) -> bool {
    !fragment.contains('\0')
}
