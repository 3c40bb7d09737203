use crate::models::{
    is_searchable_fragment, parse_student_id, NewStudent, Student, StudentDocument, StudentUpdate,
};
use crate::services::StudentStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const STUDENTS_COLLECTION: &str = "students";

#[derive(Clone)]
pub struct MongoStudentStore {
    client: MongoClient,
    db: Database,
}

impl MongoStudentStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for student-service");

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().name("name_idx".to_string()).build())
            .build();

        self.students()
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index on students collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on students.name");

        Ok(())
    }

    pub fn students(&self) -> Collection<StudentDocument> {
        self.db.collection(STUDENTS_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes pooled connections. Call once the HTTP server has stopped.
    pub async fn shutdown(self) {
        tracing::info!("Closing MongoDB client");
        self.client.shutdown().await;
    }
}

/// Filter matching `fragment` anywhere in `name`, ignoring case. The fragment is
/// escaped so regex metacharacters match themselves. `None` when MongoDB cannot
/// express the pattern (embedded NUL), which means nothing can match.
pub fn name_contains_filter(fragment: &str) -> Option<Document> {
    if !is_searchable_fragment(fragment) {
        return None;
    }

    Some(doc! {
        "name": {
            "$regex": regex::escape(fragment),
            "$options": "i",
        }
    })
}

#[async_trait]
impl StudentStore for MongoStudentStore {
    async fn create(&self, student: NewStudent) -> Result<Student, AppError> {
        let document = StudentDocument::new(student);

        self.students()
            .insert_one(&document, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert student: {}", e);
                AppError::from(e)
            })?;

        tracing::info!(student_id = %document.id, "Student created");
        Ok(Student::from(document))
    }

    async fn update(&self, id: &str, update: StudentUpdate) -> Result<Option<Student>, AppError> {
        let Some(oid) = parse_student_id(id) else {
            return Ok(None);
        };

        let mut set = doc! { "assignedQuestions": update.assigned_questions };
        if let Some(name) = update.name {
            set.insert("name", name);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .students()
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set }, options)
            .await
            .map_err(|e| {
                tracing::error!(student_id = %id, "Failed to update student: {}", e);
                AppError::from(e)
            })?;

        Ok(updated.map(Student::from))
    }

    async fn get_all(&self) -> Result<Vec<Student>, AppError> {
        let cursor = self.students().find(None, None).await.map_err(|e| {
            tracing::error!("Failed to list students: {}", e);
            AppError::from(e)
        })?;

        let students: Vec<StudentDocument> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect students: {}", e);
            AppError::from(e)
        })?;

        Ok(students.into_iter().map(Student::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Student>, AppError> {
        let Some(oid) = parse_student_id(id) else {
            return Ok(None);
        };

        let student = self
            .students()
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(student_id = %id, "Failed to find student: {}", e);
                AppError::from(e)
            })?;

        Ok(student.map(Student::from))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, AppError> {
        let Some(oid) = parse_student_id(id) else {
            return Ok(false);
        };

        let result = self
            .students()
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(student_id = %id, "Failed to delete student: {}", e);
                AppError::from(e)
            })?;

        Ok(result.deleted_count > 0)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, AppError> {
        let Some(filter) = name_contains_filter(fragment) else {
            return Ok(Vec::new());
        };

        let cursor = self
            .students()
            .find(filter, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search students by name: {}", e);
                AppError::from(e)
            })?;

        let students: Vec<StudentDocument> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect students: {}", e);
            AppError::from(e)
        })?;

        Ok(students.into_iter().map(Student::from).collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
