use mongodb::bson::doc;
use student_service::config::StudentConfig;
use student_service::models::StudentDocument;
use student_service::services::MongoStudentStore;
use student_service::startup::Application;
use uuid::Uuid;

pub const TEST_MONGO_URI: &str = "mongodb://localhost:27017";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: MongoStudentStore,
    pub db_name: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns the full application on a random port against a throwaway database.
    pub async fn spawn() -> Self {
        if std::env::var("MONGO_URI").is_err() {
            std::env::set_var("MONGO_URI", TEST_MONGO_URI);
        }

        let db_name = format!("student_test_{}", Uuid::new_v4());

        let mut config = StudentConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            db_name,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Inserts directly into the collection, bypassing the HTTP layer.
    pub async fn insert_student(&self, name: &str, assigned_questions: &str) -> String {
        let document = StudentDocument {
            id: mongodb::bson::oid::ObjectId::new(),
            name: name.to_string(),
            assigned_questions: assigned_questions.to_string(),
        };
        self.store
            .students()
            .insert_one(&document, None)
            .await
            .expect("Failed to insert test student");
        document.id.to_hex()
    }

    pub async fn count_students(&self) -> u64 {
        self.store
            .students()
            .count_documents(doc! {}, None)
            .await
            .expect("Failed to count students")
    }

    /// Drops the per-test database.
    pub async fn cleanup(&self) {
        let _ = self
            .store
            .client()
            .database(&self.db_name)
            .drop(None)
            .await;
    }
}
