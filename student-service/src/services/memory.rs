use crate::models::{
    is_searchable_fragment, parse_student_id, NewStudent, Student, StudentDocument, StudentUpdate,
};
use crate::services::StudentStore;
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process store for tests. Keeps insertion order and mirrors the id
/// handling of the MongoDB store.
#[derive(Default)]
pub struct InMemoryStudentStore {
    students: RwLock<Vec<StudentDocument>>,
    unavailable: AtomicBool,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store is unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn create(&self, student: NewStudent) -> Result<Student, AppError> {
        self.ensure_available()?;
        let document = StudentDocument::new(student);
        self.students.write().await.push(document.clone());
        Ok(Student::from(document))
    }

    async fn update(&self, id: &str, update: StudentUpdate) -> Result<Option<Student>, AppError> {
        self.ensure_available()?;
        let Some(oid) = parse_student_id(id) else {
            return Ok(None);
        };

        let mut students = self.students.write().await;
        let Some(existing) = students.iter_mut().find(|s| s.id == oid) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            existing.name = name;
        }
        existing.assigned_questions = update.assigned_questions;

        Ok(Some(Student::from(existing.clone())))
    }

    async fn get_all(&self) -> Result<Vec<Student>, AppError> {
        self.ensure_available()?;
        let students = self.students.read().await;
        Ok(students.iter().cloned().map(Student::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Student>, AppError> {
        self.ensure_available()?;
        let Some(oid) = parse_student_id(id) else {
            return Ok(None);
        };

        let students = self.students.read().await;
        Ok(students
            .iter()
            .find(|s| s.id == oid)
            .cloned()
            .map(Student::from))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, AppError> {
        self.ensure_available()?;
        let Some(oid) = parse_student_id(id) else {
            return Ok(false);
        };

        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|s| s.id != oid);
        Ok(students.len() < before)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, AppError> {
        self.ensure_available()?;
        if !is_searchable_fragment(fragment) {
            return Ok(Vec::new());
        }
        let needle = fragment.to_lowercase();

        let students = self.students.read().await;
        Ok(students
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .map(Student::from)
            .collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.ensure_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_student(name: &str, questions: &str) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            assigned_questions: questions.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_object_id() {
        let store = InMemoryStudentStore::new();
        let student = store.create(new_student("Bob", "")).await.unwrap();

        assert!(parse_student_id(&student.id).is_some());
        assert_eq!(store.get_by_id(&student.id).await.unwrap(), Some(student));
    }

    #[tokio::test]
    async fn update_replaces_assigned_questions() {
        let store = InMemoryStudentStore::new();
        let student = store.create(new_student("Dana", "Q1, Q2")).await.unwrap();

        let updated = store
            .update(
                &student.id,
                StudentUpdate {
                    name: None,
                    assigned_questions: String::new(),
                },
            )
            .await
            .unwrap()
            .expect("student exists");

        assert_eq!(updated.name, "Dana");
        assert_eq!(updated.assigned_questions, "");
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = InMemoryStudentStore::new();
        let student = store.create(new_student("Eve", "")).await.unwrap();

        assert!(store.delete_by_id(&student.id).await.unwrap());
        assert!(!store.delete_by_id(&student.id).await.unwrap());
        assert!(!store.delete_by_id("garbage").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn search_treats_fragment_literally() {
        let store = InMemoryStudentStore::new();
        store.create(new_student("Alice", "")).await.unwrap();
        store.create(new_student("a.*", "")).await.unwrap();

        assert_eq!(store.search_by_name("ALI").await.unwrap().len(), 1);
        let literal = store.search_by_name(".*").await.unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].name, "a.*");
    }

    #[tokio::test]
    async fn nul_fragment_matches_nothing() {
        let store = InMemoryStudentStore::new();
        store.create(new_student("a\0b", "")).await.unwrap();

        assert!(store.search_by_name("\0").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryStudentStore::new();
        store.set_unavailable(true);

        assert!(store.get_all().await.is_err());
        assert!(store.health_check().await.is_err());
    }
}
