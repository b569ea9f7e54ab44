use crate::common::{TestApp, TestResponse, routes};
use exam_server::entity::{exam_detail, exam_master};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

/// A student plus two subjects, the usual starting point for exam tests.
async fn student_with_two_subjects(app: &TestApp) -> (i32, i32, i32) {
    let student = app.create_student("Alice Johnson", "alice@example.com").await;
    let math = app.create_subject("Mathematics").await;
    let english = app.create_subject("English").await;
    (student, math, english)
}

async fn stored_rows(app: &TestApp) -> (u64, u64) {
    let masters = exam_master::Entity::find().count(&app.db).await.unwrap();
    let details = exam_detail::Entity::find().count(&app.db).await.unwrap();
    (masters, details)
}

mod exam_creation {
    use super::*;

    #[tokio::test]
    async fn failing_subject_makes_record_fail() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let res = app
            .create_exam(student, 2024, &[(math, 30.0), (english, 20.0)])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["totalMark"].as_f64(), Some(50.0));
        assert_eq!(res.body["passOrFail"], "FAIL");
        assert_eq!(res.body["examYear"], 2024);
        assert_eq!(res.body["studentID"], student);
        assert_eq!(res.body["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn all_subjects_at_pass_mark_make_record_pass() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let res = app
            .create_exam(student, 2024, &[(math, 40.0), (english, 60.0)])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["totalMark"].as_f64(), Some(100.0));
        assert_eq!(res.body["passOrFail"], "PASS");
    }

    #[tokio::test]
    async fn exactly_pass_mark_passes() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let res = app
            .create_exam(student, 2023, &[(math, 25.0), (english, 25.0)])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["passOrFail"], "PASS");
    }

    #[tokio::test]
    async fn response_matches_stored_record() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let created = app
            .create_exam(student, 2024, &[(math, 72.5), (english, 48.25)])
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        let id = created.id("masterID");
        assert_eq!(created.location, Some(routes::exam(id)));

        let fetched = app.get(&routes::exam(id)).await;

        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, created.body);
        assert_eq!(fetched.body["totalMark"].as_f64(), Some(120.75));
        assert_eq!(fetched.body["student"]["studentName"], "Alice Johnson");
    }

    #[tokio::test]
    async fn details_keep_submission_order_and_subject_names() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let created = app
            .create_exam(student, 2024, &[(english, 55.0), (math, 65.0)])
            .await;
        let id = created.id("masterID");

        let res = app.get(&routes::exam_details(id)).await;

        assert_eq!(res.status, 200);
        let details = res.body.as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["subjectID"], english);
        assert_eq!(details[0]["subject"]["subjectName"], "English");
        assert_eq!(details[0]["masterID"], id);
        assert_eq!(details[1]["subjectID"], math);
        assert_eq!(details[1]["marks"].as_f64(), Some(65.0));
    }

    #[tokio::test]
    async fn same_student_may_sit_different_years() {
        let app = TestApp::spawn().await;
        let (student, math, _) = student_with_two_subjects(&app).await;

        let first = app.create_exam(student, 2023, &[(math, 50.0)]).await;
        let second = app.create_exam(student, 2024, &[(math, 60.0)]).await;

        assert_eq!(first.status, 201, "{}", first.text);
        assert_eq!(second.status, 201, "{}", second.text);
        assert_ne!(first.id("masterID"), second.id("masterID"));
    }
}

mod exam_rejection {
    use super::*;

    #[tokio::test]
    async fn duplicate_student_and_year_is_conflict() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;
        let original = app
            .create_exam(student, 2024, &[(math, 30.0), (english, 20.0)])
            .await;
        let id = original.id("masterID");

        let res = app
            .create_exam(student, 2024, &[(math, 90.0), (english, 90.0)])
            .await;

        res.assert_error(409, "CONFLICT");
        assert_eq!(
            res.body["message"],
            "An exam for this student and year already exists."
        );

        let fetched = app.get(&routes::exam(id)).await;
        assert_eq!(fetched.body, original.body);
        assert_eq!(stored_rows(&app).await, (1, 2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicates_yield_one_record_and_conflicts() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;
        let body = json!({
            "studentID": student,
            "examYear": 2030,
            "details": [
                { "subjectID": math, "marks": 40 },
                { "subjectID": english, "marks": 60 },
            ],
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = app.client.clone();
                let url = app.url(routes::EXAMS);
                let body = body.clone();
                tokio::spawn(async move {
                    let res = client.post(url).json(&body).send().await.unwrap();
                    TestResponse::from_response(res).await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            let res = handle.await.unwrap();
            match res.status {
                201 => created += 1,
                _ => res.assert_error(409, "CONFLICT"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(stored_rows(&app).await, (1, 2));
    }

    #[tokio::test]
    async fn empty_details_are_rejected() {
        let app = TestApp::spawn().await;
        let (student, _, _) = student_with_two_subjects(&app).await;

        let res = app.create_exam(student, 2024, &[]).await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "At least one subject mark is required.");
        assert_eq!(stored_rows(&app).await, (0, 0));
    }

    #[tokio::test]
    async fn duplicate_subjects_are_rejected() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let res = app
            .create_exam(student, 2024, &[(math, 40.0), (english, 50.0), (math, 60.0)])
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(
            res.body["message"],
            "Duplicate subjects are not allowed. Each subject can only be added once."
        );
        assert_eq!(stored_rows(&app).await, (0, 0));
    }

    #[tokio::test]
    async fn out_of_range_marks_are_rejected() {
        let app = TestApp::spawn().await;
        let (student, math, english) = student_with_two_subjects(&app).await;

        let res = app
            .create_exam(student, 2024, &[(math, 40.0), (english, 100.5)])
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Marks must be between 0 and 100.");
        assert_eq!(stored_rows(&app).await, (0, 0));
    }

    #[tokio::test]
    async fn year_outside_range_is_rejected() {
        let app = TestApp::spawn().await;
        let (student, math, _) = student_with_two_subjects(&app).await;

        let res = app.create_exam(student, 1999, &[(math, 40.0)]).await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Exam year must be between 2000 and 2100.");
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let app = TestApp::spawn().await;
        let math = app.create_subject("Mathematics").await;

        let res = app.create_exam(9999, 2024, &[(math, 40.0)]).await;

        res.assert_error(404, "NOT_FOUND");
        assert_eq!(res.body["message"], "Student not found.");
        assert_eq!(stored_rows(&app).await, (0, 0));
    }

    #[tokio::test]
    async fn unknown_subject_is_rejected_and_nothing_is_stored() {
        let app = TestApp::spawn().await;
        let (student, math, _) = student_with_two_subjects(&app).await;

        let res = app
            .create_exam(student, 2024, &[(math, 40.0), (424242, 50.0)])
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(
            res.body["message"],
            "One or more subjects are invalid: 424242"
        );
        assert_eq!(stored_rows(&app).await, (0, 0));
    }

    #[tokio::test]
    async fn missing_details_field_is_rejected() {
        let app = TestApp::spawn().await;
        let (student, _, _) = student_with_two_subjects(&app).await;

        let res = app
            .post(routes::EXAMS, &json!({ "studentID": student, "examYear": 2024 }))
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
    }
}

mod exam_reads {
    use super::*;

    #[tokio::test]
    async fn unknown_exam_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::exam(12345)).await;

        res.assert_error(404, "NOT_FOUND");
        assert_eq!(res.body["message"], "Exam not found.");
    }

    #[tokio::test]
    async fn details_of_unknown_exam_are_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::exam_details(12345)).await;

        res.assert_error(404, "NOT_FOUND");
        assert_eq!(res.body["message"], "No details found for this exam.");
    }

    #[tokio::test]
    async fn list_returns_newest_record_first() {
        let app = TestApp::spawn().await;
        let (alice, math, english) = student_with_two_subjects(&app).await;
        let bob = app.create_student("Bob Smith", "bob@example.com").await;

        let older = app
            .create_exam(alice, 2023, &[(math, 30.0), (english, 20.0)])
            .await
            .id("masterID");
        let newer = app
            .create_exam(bob, 2024, &[(math, 80.0)])
            .await
            .id("masterID");

        let res = app.get(routes::EXAMS).await;

        assert_eq!(res.status, 200);
        let records = res.body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["masterID"], newer);
        assert_eq!(records[0]["student"]["studentName"], "Bob Smith");
        assert_eq!(records[0]["passOrFail"], "PASS");
        assert_eq!(records[1]["masterID"], older);
        assert_eq!(records[1]["details"].as_array().unwrap().len(), 2);
        assert_eq!(records[1]["passOrFail"], "FAIL");
    }

    #[tokio::test]
    async fn empty_database_lists_no_exams() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::EXAMS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }
}
