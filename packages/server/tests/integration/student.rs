use crate::common::{TestApp, routes};
use serde_json::json;

mod student_creation {
    use super::*;

    #[tokio::test]
    async fn creates_student_and_sets_location() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::STUDENTS,
                &json!({ "studentName": "Alice Johnson", "mail": "alice@example.com" }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["studentName"], "Alice Johnson");
        assert_eq!(res.body["mail"], "alice@example.com");
        let id = res.id("studentID");
        assert_eq!(res.location, Some(routes::student(id)));

        let fetched = app.get(&routes::student(id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, res.body);
    }

    #[tokio::test]
    async fn trims_surrounding_whitespace() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::STUDENTS,
                &json!({ "studentName": "  Bob Smith  ", "mail": " bob@example.com " }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["studentName"], "Bob Smith");
        assert_eq!(res.body["mail"], "bob@example.com");
    }

    #[tokio::test]
    async fn rejects_short_name() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::STUDENTS,
                &json!({ "studentName": "Al", "mail": "al@example.com" }),
            )
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(
            res.body["message"],
            "Student name must be between 5 and 250 characters."
        );
    }

    #[tokio::test]
    async fn rejects_mail_without_at_sign() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::STUDENTS,
                &json!({ "studentName": "Carol White", "mail": "carol.example.com" }),
            )
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Valid email address is required.");
    }

    #[tokio::test]
    async fn duplicate_mail_is_conflict() {
        let app = TestApp::spawn().await;
        app.create_student("Dana Brown", "dana@example.com").await;

        let res = app
            .post(
                routes::STUDENTS,
                &json!({ "studentName": "Dana Browning", "mail": "dana@example.com" }),
            )
            .await;

        res.assert_error(409, "CONFLICT");

        let list = app.get(routes::STUDENTS).await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_field_is_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::STUDENTS, &json!({ "studentName": "Erin Green" }))
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::STUDENTS, "{\"studentName\": ").await;

        res.assert_error(400, "VALIDATION_ERROR");
    }
}

mod student_lookup {
    use super::*;

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::student(404)).await;

        res.assert_error(404, "NOT_FOUND");
        assert_eq!(res.body["message"], "Student not found.");
    }
}

mod student_listing {
    use super::*;

    #[tokio::test]
    async fn empty_database_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::STUDENTS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn lists_students_by_name() {
        let app = TestApp::spawn().await;
        app.create_student("Zoe Walker", "zoe@example.com").await;
        app.create_student("Adam Baker", "adam@example.com").await;
        app.create_student("Mona Lisa", "mona@example.com").await;

        let res = app.get(routes::STUDENTS).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["studentName"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Adam Baker", "Mona Lisa", "Zoe Walker"]);
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
}
