//! In-memory implementation of the LUMINA wire contract, used by the core
//! crate's integration tests and runnable standalone for local demos.
//!
//! Auth issues synthetic bearer tokens; student and teacher routes serve
//! fixed fixtures wrapped in the `{success, <key>: [...]}` envelope. Error
//! bodies follow the FastAPI shapes the client's extractor chain expects:
//! `{"detail": "..."}` for plain failures and
//! `{"detail": [{"msg": ...}]}` for validation failures.
//!
//! Student read routes honor an `x-mock-delay-ms` request header so tests
//! can stagger response latencies.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Teacher,
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

#[derive(Clone, Debug)]
struct Account {
    user: User,
    password: String,
    token: String,
}

/// A recorded material upload, kept so tests can assert on what arrived.
#[derive(Clone, Debug)]
pub struct UploadRecord {
    pub title: String,
    pub class_id: i64,
    pub filename: String,
    pub size: usize,
}

#[derive(Default)]
pub struct MockDb {
    accounts: Vec<Account>,
    next_id: i64,
    pub uploads: Vec<UploadRecord>,
    pub grades: Vec<Value>,
    pub sent_messages: Vec<Value>,
}

pub type Db = Arc<RwLock<MockDb>>;

type Reply = (StatusCode, Json<Value>);

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
    user_type: UserType,
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct StudentsQuery {
    class_id: i64,
}

#[derive(Deserialize)]
struct GradeBody {
    class_id: i64,
    student_id: i64,
    subject: String,
    grade: f64,
}

#[derive(Deserialize)]
struct MessageBody {
    class_id: i64,
    subject: String,
    message: String,
}

pub fn app() -> Router {
    app_with_db(Arc::new(RwLock::new(MockDb::default())))
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/student/subjects", get(student_subjects))
        .route("/api/student/materials", get(student_materials))
        .route("/api/student/messages", get(student_messages))
        .route("/api/teacher/classes", get(teacher_classes))
        .route("/api/teacher/students", get(teacher_students))
        .route("/api/teacher/materials", post(upload_material))
        .route("/api/teacher/grades", post(submit_grade))
        .route("/api/teacher/messages", post(send_message))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn detail(status: StatusCode, msg: &str) -> Reply {
    (status, Json(json!({ "detail": msg })))
}

fn validation(field: &str, msg: &str) -> Reply {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{ "loc": ["body", field], "msg": msg, "type": "value_error" }]
        })),
    )
}

/// Look up the account behind the bearer token and check its role.
async fn authorize(db: &Db, headers: &HeaderMap, required: UserType) -> Result<User, Reply> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    let db = db.read().await;
    let account = db
        .accounts
        .iter()
        .find(|account| account.token == token)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid token"))?;
    if account.user.user_type != required {
        let msg = match required {
            UserType::Student => "Student access required",
            UserType::Teacher => "Teacher access required",
        };
        return Err(detail(StatusCode::FORBIDDEN, msg));
    }
    Ok(account.user.clone())
}

/// Sleep for the duration a test asked for, if any.
async fn mock_delay(headers: &HeaderMap) {
    if let Some(ms) = headers
        .get("x-mock-delay-ms")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
    {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "version": "1.0.0" }))
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterBody>,
) -> Result<Json<Value>, Reply> {
    let name_len = input.name.chars().count();
    if !(3..=100).contains(&name_len) {
        return Err(validation("name", "name must be between 3 and 100 characters"));
    }
    if input.password.chars().count() < 6 {
        return Err(validation("password", "password must be at least 6 characters"));
    }

    let mut db = db.write().await;
    if db.accounts.iter().any(|account| account.user.email == input.email) {
        return Err(detail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    db.next_id += 1;
    let id = db.next_id;
    let token = format!("mock-token-{id}");
    let user = User {
        id,
        name: input.name,
        email: input.email,
        user_type: input.user_type,
    };
    db.accounts.push(Account {
        user: user.clone(),
        password: input.password,
        token: token.clone(),
    });

    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user,
    })))
}

async fn login(State(db): State<Db>, Json(input): Json<LoginBody>) -> Result<Json<Value>, Reply> {
    let db = db.read().await;
    let account = db
        .accounts
        .iter()
        .find(|account| account.user.email == input.email && account.password == input.password)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;

    Ok(Json(json!({
        "access_token": account.token,
        "token_type": "bearer",
        "user": account.user,
    })))
}

async fn student_subjects(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Student).await?;
    mock_delay(&headers).await;
    Ok(Json(json!({
        "success": true,
        "subjects": [
            { "id": 1, "name": "Mathematics", "teacher": "Prof. Carlos", "grade": 8.5 },
            { "id": 2, "name": "Portuguese", "teacher": "Prof. Ana", "grade": 9.0 },
        ],
    })))
}

async fn student_materials(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Student).await?;
    mock_delay(&headers).await;
    Ok(Json(json!({
        "success": true,
        "materials": [
            {
                "id": 1,
                "subject": "Mathematics",
                "title": "Linear Algebra",
                "date": "2024-01-15",
                "file_url": "https://files.example.com/linear-algebra.pdf",
            },
        ],
    })))
}

async fn student_messages(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Student).await?;
    mock_delay(&headers).await;
    Ok(Json(json!({
        "success": true,
        "messages": [
            {
                "id": 1,
                "from": "Prof. Carlos",
                "subject": "Mathematics",
                "message": "Reminder: exam on Jan 20",
                "date": "2024-01-10",
            },
        ],
    })))
}

async fn teacher_classes(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Teacher).await?;
    Ok(Json(json!({
        "success": true,
        "classes": [
            { "id": 1, "name": "Mathematics - Year 3A", "students_count": 30 },
            { "id": 2, "name": "Mathematics - Year 3B", "students_count": 28 },
        ],
    })))
}

async fn teacher_students(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<StudentsQuery>,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Teacher).await?;
    if !matches!(query.class_id, 1 | 2) {
        return Err(detail(StatusCode::NOT_FOUND, "Class not found"));
    }
    Ok(Json(json!({
        "success": true,
        "students": [
            { "id": 1, "name": "Joana Silva", "email": "joana@example.com" },
            { "id": 2, "name": "Pedro Souza", "email": "pedro@example.com" },
        ],
    })))
}

async fn upload_material(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Teacher).await?;

    let mut title: Option<String> = None;
    let mut class_id: Option<i64> = None;
    let mut file: Option<(String, usize)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| detail(StatusCode::BAD_REQUEST, "Malformed multipart body"))?
    {
        match field.name().map(str::to_string).as_deref() {
            Some("title") => title = field.text().await.ok(),
            Some("class_id") => {
                class_id = field.text().await.ok().and_then(|raw| raw.parse().ok());
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| detail(StatusCode::BAD_REQUEST, "Malformed multipart body"))?;
                file = Some((filename, bytes.len()));
            }
            _ => {}
        }
    }

    let Some(title) = title.filter(|title| !title.is_empty()) else {
        return Err(validation("title", "field required"));
    };
    let Some(class_id) = class_id else {
        return Err(validation("class_id", "field required"));
    };
    let Some((filename, size)) = file else {
        return Err(validation("file", "field required"));
    };

    db.write().await.uploads.push(UploadRecord {
        title,
        class_id,
        filename,
        size,
    });
    Ok(Json(json!({ "success": true, "message": "Material uploaded" })))
}

async fn submit_grade(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<GradeBody>,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Teacher).await?;
    if !(0.0..=10.0).contains(&input.grade) {
        return Err(validation("grade", "grade must be between 0 and 10"));
    }
    db.write().await.grades.push(json!({
        "class_id": input.class_id,
        "student_id": input.student_id,
        "subject": input.subject,
        "grade": input.grade,
    }));
    Ok(Json(json!({ "success": true, "message": "Grade recorded" })))
}

async fn send_message(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<MessageBody>,
) -> Result<Json<Value>, Reply> {
    authorize(&db, &headers, UserType::Teacher).await?;
    if input.message.chars().count() > 1000 {
        return Err(validation("message", "message must be at most 1000 characters"));
    }
    db.write().await.sent_messages.push(json!({
        "class_id": input.class_id,
        "subject": input.subject,
        "message": input.message,
    }));
    Ok(Json(json!({ "success": true, "message": "Message sent" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_serializes_to_wire_strings() {
        assert_eq!(serde_json::to_value(UserType::Student).unwrap(), "student");
        assert_eq!(serde_json::to_value(UserType::Teacher).unwrap(), "teacher");
    }

    #[test]
    fn register_body_requires_all_fields() {
        let result: Result<RegisterBody, _> =
            serde_json::from_str(r#"{"email":"a@b.c","password":"secret1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validation_reply_matches_fastapi_shape() {
        let (status, Json(body)) = validation("password", "too short");
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["msg"], "too short");
        assert_eq!(body["detail"][0]["loc"][1], "password");
    }
}
