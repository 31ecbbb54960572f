mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{login_as, send, setup_test_app};
use registrar_core::Privilege;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create_student(app: &Router, token: &str, educational_id: &str, group_id: Option<i64>) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/student",
        Some(token),
        Some(json!({
            "educational_id": educational_id,
            "name": "Ivan",
            "surname": "Petrov",
            "phone": "  ",
            "group_id": group_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn create_named(app: &Router, token: &str, uri: &str, name: &str) -> i64 {
    let (status, body) = send(app, "POST", uri, Some(token), Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_guest_cannot_touch_students(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, guest) = login_as(&app, &pool, "guest", Privilege::Guest).await;

    let (status, body) = send(&app, "GET", "/api/student", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("records:read"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/student",
        Some(&guest),
        Some(json!({ "educational_id": "E1", "name": "A", "surname": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_read_enriched_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, "teacher", Privilege::Teacher).await;
    let group_id = create_named(&app, &token, "/api/group", "CS-101").await;
    let subject_id = create_named(&app, &token, "/api/subject", "Algebra").await;

    let student = create_student(&app, &token, "E-001", Some(group_id)).await;
    assert!(student["phone"].is_null());
    assert_eq!(student["entrance"], false);
    let student_id = student["id"].as_i64().unwrap();

    let (status, diploma) = send(
        &app,
        "PUT",
        &format!("/api/student/{}/diploma", student_id),
        Some(&token),
        Some(json!({ "title": "Graph coloring", "chapters": 3, "originality": 87 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(diploma["originality"], 87);

    let (status, exam) = send(
        &app,
        "POST",
        &format!("/api/student/{}/exams", student_id),
        Some(&token),
        Some(json!({ "subject_id": subject_id, "semester": 2, "score": 91 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(exam["subject"], "Algebra");

    let (status, students) = send(
        &app,
        "GET",
        &format!("/api/student?student_id={}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let info = &students[0];
    assert_eq!(info["group"], "CS-101");
    assert_eq!(info["diploma"], "Graph coloring");
    assert_eq!(info["exams"], 1);
    assert!(info.get("group_id").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_with_unknown_group(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, "teacher", Privilege::Teacher).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/student",
        Some(&token),
        Some(json!({ "educational_id": "E-9", "name": "A", "surname": "B", "group_id": 4242 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["missing_ids"], json!([4242]));

    create_student(&app, &token, "E-9", None).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/student",
        Some(&token),
        Some(json!({ "educational_id": "E-9", "name": "C", "surname": "D" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_update_students(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, "teacher", Privilege::Teacher).await;
    let group_id = create_named(&app, &token, "/api/group", "G").await;
    let a = create_student(&app, &token, "A-1", Some(group_id)).await["id"].as_i64().unwrap();
    let b = create_student(&app, &token, "B-1", None).await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        "/api/student",
        Some(&token),
        Some(json!({ "items": [
            { "id": a, "group_id": null, "entrance": true },
            { "id": b, "group_id": group_id, "name": "Olga" }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, students) = send(&app, "GET", "/api/student", Some(&token), None).await;
    let by_id = |id: i64| {
        students
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["id"] == id)
            .cloned()
            .unwrap()
    };
    assert!(by_id(a)["group"].is_null());
    assert_eq!(by_id(a)["entrance"], true);
    assert_eq!(by_id(b)["group"], "G");
    assert_eq!(by_id(b)["name"], "Olga");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/student",
        Some(&token),
        Some(json!({ "items": [
            { "id": a, "name": "Never" },
            { "id": 777777, "name": "Never" }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["missing_ids"], json!([777777]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_students_cascades(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, "teacher", Privilege::Teacher).await;
    let subject_id = create_named(&app, &token, "/api/subject", "Physics").await;
    let student_id = create_student(&app, &token, "D-1", None).await["id"].as_i64().unwrap();

    send(
        &app,
        "PUT",
        &format!("/api/student/{}/diploma", student_id),
        Some(&token),
        Some(json!({ "title": "T" })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/student/{}/exams", student_id),
        Some(&token),
        Some(json!({ "subject_id": subject_id, "semester": 1, "score": 50 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/student",
        Some(&token),
        Some(json!({ "ids": [student_id, 424242] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["missing_ids"], json!([424242]));

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/student",
        Some(&token),
        Some(json!({ "ids": [student_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let exams: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
        .fetch_one(&pool)
        .await
        .unwrap();
    let diplomas: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diplomas")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(exams, 0);
    assert_eq!(diplomas, 0);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/student/{}/diploma", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_diploma_and_exam_validation(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, "teacher", Privilege::Teacher).await;
    let student_id = create_student(&app, &token, "V-1", None).await["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/student/{}/diploma", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/student/{}/diploma", student_id),
        Some(&token),
        Some(json!({ "originality": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/student/{}/exams", student_id),
        Some(&token),
        Some(json!({ "subject_id": 31337, "semester": 1, "score": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, exams) = send(
        &app,
        "GET",
        &format!("/api/student/{}/exams", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exams, json!([]));

    let (status, students) = send(&app, "GET", "/api/student?student_id=999999", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(students, json!([]));

    let (status, _) = send(&app, "GET", "/api/student/not-a-number/exams", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_diploma_put_replaces_first(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, "teacher", Privilege::Teacher).await;
    let student_id = create_student(&app, &token, "R-1", None).await["id"].as_i64().unwrap();
    let uri = format!("/api/student/{}/diploma", student_id);

    let (status, first) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "title": "Draft", "chapters": 2, "originality": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "title": "Final" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["title"], "Final");
    assert_eq!(second["chapters"], 0);

    let diplomas: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diplomas")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(diplomas, 1);
}
