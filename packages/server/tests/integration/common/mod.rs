use std::net::SocketAddr;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tempfile::TempDir;

use exam_server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
use exam_server::state::AppState;

pub mod routes {
    pub const HEALTH: &str = "/api/health";
    pub const STUDENTS: &str = "/api/students";
    pub const SUBJECTS: &str = "/api/subjects";
    pub const EXAMS: &str = "/api/exams";

    pub fn student(id: i32) -> String {
        format!("/api/students/{id}")
    }

    pub fn subject(id: i32) -> String {
        format!("/api/subjects/{id}")
    }

    pub fn exam(id: i32) -> String {
        format!("/api/exams/{id}")
    }

    pub fn exam_details(id: i32) -> String {
        format!("/api/exams/{id}/details")
    }
}

/// A running test server backed by a throwaway SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// `Location` header, if the server set one.
    pub location: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("test.db").display()
        );

        let database = DatabaseConfig {
            url: db_url,
            max_connections: 5,
            seed_subjects: false,
            log_statements: false,
        };

        let db = exam_server::database::init_db(&database)
            .await
            .expect("Failed to initialize test database");
        exam_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database,
        };

        let state = AppState {
            db: db.clone(),
            config: app_config,
        };

        let app = exam_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// POST a raw body labelled as JSON, for malformed payloads.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Create a student via the API and return its `studentID`.
    pub async fn create_student(&self, name: &str, mail: &str) -> i32 {
        let res = self
            .post(
                routes::STUDENTS,
                &json!({ "studentName": name, "mail": mail }),
            )
            .await;
        assert_eq!(res.status, 201, "create_student failed: {}", res.text);
        res.id("studentID")
    }

    /// Create a subject via the API and return its `subjectID`.
    pub async fn create_subject(&self, name: &str) -> i32 {
        let res = self
            .post(routes::SUBJECTS, &json!({ "subjectName": name }))
            .await;
        assert_eq!(res.status, 201, "create_subject failed: {}", res.text);
        res.id("subjectID")
    }

    /// Submit an exam record built from `(subject_id, marks)` pairs.
    pub async fn create_exam(
        &self,
        student_id: i32,
        year: i32,
        marks: &[(i32, f64)],
    ) -> TestResponse {
        let details: Vec<Value> = marks
            .iter()
            .map(|(subject_id, marks)| json!({ "subjectID": subject_id, "marks": marks }))
            .collect();

        self.post(
            routes::EXAMS,
            &json!({
                "studentID": student_id,
                "examYear": year,
                "details": details,
            }),
        )
        .await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            location,
        }
    }

    pub fn id(&self, field: &str) -> i32 {
        self.body[field]
            .as_i64()
            .unwrap_or_else(|| panic!("response body should contain '{field}'"))
            as i32
    }

    /// Assert an error envelope with the given status and code.
    pub fn assert_error(&self, status: u16, code: &str) {
        assert_eq!(self.status, status, "unexpected status: {}", self.text);
        assert_eq!(self.body["code"], code, "unexpected body: {}", self.text);
        assert!(
            self.body["message"]
                .as_str()
                .is_some_and(|m| !m.is_empty()),
            "error should carry a message: {}",
            self.text
        );
    }
}
