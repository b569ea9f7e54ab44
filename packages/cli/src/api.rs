use std::time::Duration;

use common::models::{
    CreateExamRequest, CreateStudentRequest, CreateSubjectRequest, ExamDetail, ExamRecord,
    Student, Subject,
};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with its `{code, message}` error body.
    #[error("{code}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ApiError {
    fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(err) => ApiError::Server {
                status,
                code: err.code,
                message: err.message,
            },
            Err(_) => ApiError::Unexpected {
                status,
                body: body.trim().to_string(),
            },
        }
    }
}

/// Blocking client for the exam server's `/api` routes.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let res = self.http.get(self.url(path)).send()?;
        decode(res)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let res = self.http.post(self.url(path)).json(body).send()?;
        decode(res)
    }

    pub fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.get("/students")
    }

    pub fn create_student(&self, request: &CreateStudentRequest) -> Result<Student, ApiError> {
        self.post("/students", request)
    }

    pub fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.get("/subjects")
    }

    pub fn create_subject(&self, request: &CreateSubjectRequest) -> Result<Subject, ApiError> {
        self.post("/subjects", request)
    }

    pub fn list_exams(&self) -> Result<Vec<ExamRecord>, ApiError> {
        self.get("/exams")
    }

    pub fn get_exam(&self, id: i32) -> Result<ExamRecord, ApiError> {
        self.get(&format!("/exams/{id}"))
    }

    pub fn get_exam_details(&self, id: i32) -> Result<Vec<ExamDetail>, ApiError> {
        self.get(&format!("/exams/{id}/details"))
    }

    pub fn create_exam(&self, request: &CreateExamRequest) -> Result<ExamRecord, ApiError> {
        self.post("/exams", request)
    }
}

fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json()?);
    }
    let body = res.text().unwrap_or_default();
    Err(ApiError::from_body(status.as_u16(), &body))
}
