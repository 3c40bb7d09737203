use crate::models::{NewStudent, StudentUpdate};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(required(message = "Missing 'name'"))]
    pub name: Option<String>,
    #[serde(rename = "assignedQuestions")]
    pub assigned_questions: Option<String>,
}

impl CreateStudentRequest {
    pub fn into_new_student(self) -> Result<NewStudent, AppError> {
        self.validate()?;

        Ok(NewStudent {
            name: self.name.unwrap_or_default(),
            assigned_questions: self.assigned_questions.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /students/:id`. Omitting `assignedQuestions` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    #[serde(rename = "assignedQuestions")]
    pub assigned_questions: Option<String>,
}

impl From<UpdateStudentRequest> for StudentUpdate {
    fn from(req: UpdateStudentRequest) -> Self {
        Self {
            name: req.name,
            assigned_questions: req.assigned_questions.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name() {
        let req: CreateStudentRequest =
            serde_json::from_str(r#"{"assignedQuestions": "Q5"}"#).unwrap();
        let err = req.into_new_student().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn create_defaults_assigned_questions() {
        let req: CreateStudentRequest = serde_json::from_str(r#"{"name": "Bob"}"#).unwrap();
        let student = req.into_new_student().unwrap();
        assert_eq!(student.name, "Bob");
        assert_eq!(student.assigned_questions, "");
    }

    #[test]
    fn update_without_assigned_questions_resets_it() {
        let req: UpdateStudentRequest = serde_json::from_str(r#"{"name": "Carol"}"#).unwrap();
        let update = StudentUpdate::from(req);
        assert_eq!(update.name.as_deref(), Some("Carol"));
        assert_eq!(update.assigned_questions, "");
    }

    #[test]
    fn empty_update_only_clears_assigned_questions() {
        let req: UpdateStudentRequest = serde_json::from_str("{}").unwrap();
        let update = StudentUpdate::from(req);
        assert!(update.name.is_none());
        assert_eq!(update.assigned_questions, "");
    }
}
