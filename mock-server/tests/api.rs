use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str, bearer: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

/// Register an account through the router and return its bearer token.
async fn register(app: &axum::Router, user_type: &str, email: &str) -> String {
    let body = format!(
        r#"{{"name":"Test Person","email":"{email}","password":"secret1","user_type":"{user_type}"}}"#
    );
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    json["access_token"].as_str().unwrap().to_string()
}

// --- health ---

#[tokio::test]
async fn health_reports_healthy() {
    let resp = app()
        .oneshot(get_request("/health", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], "1.0.0");
}

// --- auth ---

#[tokio::test]
async fn register_issues_token_and_user() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            r#"{"name":"Joana Silva","email":"joana@example.com","password":"secret1","user_type":"student"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert!(!json["access_token"].as_str().unwrap().is_empty());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["email"], "joana@example.com");
    assert_eq!(json["user"]["user_type"], "student");
}

#[tokio::test]
async fn register_rejects_short_password_with_validation_list() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            r#"{"name":"Joana Silva","email":"joana@example.com","password":"ab","user_type":"student"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(resp).await;
    assert_eq!(
        json["detail"][0]["msg"],
        "password must be at least 6 characters"
    );
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = app();
    register(&app, "student", "joana@example.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            r#"{"name":"Joana Again","email":"joana@example.com","password":"secret1","user_type":"student"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "Email already registered");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app();
    register(&app, "student", "joana@example.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            r#"{"email":"joana@example.com","password":"wrong!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "Invalid credentials");
}

#[tokio::test]
async fn login_returns_the_registered_user() {
    let app = app();
    register(&app, "teacher", "carlos@example.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            r#"{"email":"carlos@example.com","password":"secret1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["user"]["user_type"], "teacher");
}

// --- student routes ---

#[tokio::test]
async fn student_routes_require_a_token() {
    let resp = app()
        .oneshot(get_request("/api/student/subjects", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "Not authenticated");
}

#[tokio::test]
async fn student_subjects_are_enveloped() {
    let app = app();
    let token = register(&app, "student", "joana@example.com").await;

    let resp = app
        .oneshot(get_request("/api/student/subjects", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(!json["subjects"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn teacher_token_cannot_read_student_routes() {
    let app = app();
    let token = register(&app, "teacher", "carlos@example.com").await;

    let resp = app
        .oneshot(get_request("/api/student/messages", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- teacher routes ---

#[tokio::test]
async fn teacher_students_rejects_unknown_class() {
    let app = app();
    let token = register(&app, "teacher", "carlos@example.com").await;

    let resp = app
        .oneshot(get_request("/api/teacher/students?class_id=999", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "Class not found");
}

#[tokio::test]
async fn grade_out_of_range_is_a_validation_error() {
    let app = app();
    let token = register(&app, "teacher", "carlos@example.com").await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/teacher/grades")
                .header(http::header::CONTENT_TYPE, "application/json")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(r#"{"class_id":1,"student_id":1,"subject":"Math","grade":11.0}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(resp).await;
    assert_eq!(json["detail"][0]["msg"], "grade must be between 0 and 10");
}

#[tokio::test]
async fn grade_in_range_is_acknowledged() {
    let app = app();
    let token = register(&app, "teacher", "carlos@example.com").await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/teacher/grades")
                .header(http::header::CONTENT_TYPE, "application/json")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(r#"{"class_id":1,"student_id":2,"subject":"Math","grade":9.5}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Grade recorded");
}
