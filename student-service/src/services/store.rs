use crate::models::{NewStudent, Student, StudentUpdate};
use async_trait::async_trait;
use service_core::error::AppError;

/// Data-access seam between the HTTP handlers and the document store.
///
/// Identifiers are the wire (hex string) form. A malformed identifier never
/// produces an error: lookups return `None`, deletes return `false`.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn create(&self, student: NewStudent) -> Result<Student, AppError>;

    /// Returns the post-update record, or `None` when `id` does not resolve.
    async fn update(&self, id: &str, update: StudentUpdate) -> Result<Option<Student>, AppError>;

    /// Every record, in whatever order the store yields them.
    async fn get_all(&self) -> Result<Vec<Student>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Student>, AppError>;

    /// Reports whether a record was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, AppError>;

    /// Case-insensitive literal substring match on `name`.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
