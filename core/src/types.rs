//! Domain DTOs for the LUMINA API.
//!
//! # Design
//! These types mirror the backend's wire schema but are defined independently
//! of the mock-server crate; integration tests catch any schema drift. Every
//! record is an immutable value exchanged with the backend — the client never
//! mutates an entity in place, every state change is a round trip.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role. Determines which gateway set is valid to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
        }
    }
}

/// An authenticated account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "user_type")]
    pub role: Role,
}

/// A bearer token plus the user it belongs to. Created on successful
/// login/registration, persisted by `SessionStore`, destroyed on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Success payload of `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Request payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "user_type")]
    pub role: Role,
}

/// Request payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A subject as seen by a student, including the current grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub teacher: String,
    pub grade: f64,
}

/// A downloadable course material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub subject: String,
    pub title: String,
    pub date: String,
    pub file_url: String,
}

/// A message from a teacher to a student. `date` is a human-readable string,
/// passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub from: String,
    pub subject: String,
    pub message: String,
    pub date: String,
}

/// A class taught by the authenticated teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub students_count: u32,
}

/// A student enrolled in a class — a read projection of `User` without
/// role or token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Request payload for `POST /teacher/grades`. The grade is expected in the
/// 0–10 range; this layer does not enforce it, the backend does.
#[derive(Debug, Clone, Serialize)]
pub struct GradeSubmission {
    pub class_id: i64,
    pub student_id: i64,
    pub subject: String,
    pub grade: f64,
}

/// Request payload for `POST /teacher/messages`, broadcast to every student
/// in the class.
#[derive(Debug, Clone, Serialize)]
pub struct MessageSubmission {
    pub class_id: i64,
    pub subject: String,
    pub message: String,
}

/// Input for `POST /teacher/materials` (multipart upload).
#[derive(Debug, Clone)]
pub struct MaterialUpload {
    pub class_id: i64,
    pub title: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Acknowledgement returned by teacher write operations.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

/// Payload of the `GET /health` probe at the host root.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}
