//! Teacher gateway: class reads and material/grade/message writes.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::gateway::parse_json;
use crate::http::{FormPart, FormValue, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::types::{Ack, Class, GradeSubmission, MaterialUpload, MessageSubmission, StudentRecord};

/// Operations on `/teacher/*`, all bearer-authenticated.
#[derive(Debug, Clone, Copy)]
pub struct TeacherGateway<'a> {
    pub(crate) client: &'a ApiClient,
}

#[derive(Deserialize)]
struct ClassesEnvelope {
    classes: Vec<Class>,
}

#[derive(Deserialize)]
struct StudentsEnvelope {
    students: Vec<StudentRecord>,
}

impl TeacherGateway<'_> {
    fn build_get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.client.session.auth_header(),
            body: None,
        }
    }

    fn build_json_post<T: serde::Serialize>(&self, path: &str, input: &T) -> Result<HttpRequest> {
        let body =
            serde_json::to_string(input).map_err(|err| ApiError::Serialization(err.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.client.config.endpoint(path),
            headers: self.client.session.auth_header(),
            body: Some(RequestBody::Json(body)),
        })
    }

    pub fn build_classes(&self) -> HttpRequest {
        self.build_get(self.client.config.endpoint("/teacher/classes"))
    }

    pub fn parse_classes(response: HttpResponse) -> Result<Vec<Class>> {
        parse_json::<ClassesEnvelope>(response).map(|envelope| envelope.classes)
    }

    /// Classes taught by the authenticated teacher.
    pub async fn classes(&self) -> Result<Vec<Class>> {
        let response = self.client.executor.execute(self.build_classes()).await?;
        Self::parse_classes(response)
    }

    pub fn build_students(&self, class_id: i64) -> HttpRequest {
        let url = format!(
            "{}?class_id={class_id}",
            self.client.config.endpoint("/teacher/students")
        );
        self.build_get(url)
    }

    pub fn parse_students(response: HttpResponse) -> Result<Vec<StudentRecord>> {
        parse_json::<StudentsEnvelope>(response).map(|envelope| envelope.students)
    }

    /// Students enrolled in one of the teacher's classes.
    pub async fn students(&self, class_id: i64) -> Result<Vec<StudentRecord>> {
        let response = self
            .client
            .executor
            .execute(self.build_students(class_id))
            .await?;
        Self::parse_students(response)
    }

    /// Multipart body: file, title, class_id. Content-type is left to the
    /// transport so the boundary gets populated.
    pub fn build_upload_material(&self, input: MaterialUpload) -> HttpRequest {
        let parts = vec![
            FormPart {
                name: "file".to_string(),
                value: FormValue::File {
                    filename: input.filename,
                    content_type: input.content_type,
                    bytes: input.bytes,
                },
            },
            FormPart {
                name: "title".to_string(),
                value: FormValue::Text(input.title),
            },
            FormPart {
                name: "class_id".to_string(),
                value: FormValue::Text(input.class_id.to_string()),
            },
        ];
        HttpRequest {
            method: HttpMethod::Post,
            url: self.client.config.endpoint("/teacher/materials"),
            headers: self.client.session.auth_header(),
            body: Some(RequestBody::Form(parts)),
        }
    }

    pub fn parse_ack(response: HttpResponse) -> Result<Ack> {
        parse_json(response)
    }

    /// Share a material file with a class.
    pub async fn upload_material(&self, input: MaterialUpload) -> Result<Ack> {
        let response = self
            .client
            .executor
            .execute(self.build_upload_material(input))
            .await?;
        Self::parse_ack(response)
    }

    pub fn build_submit_grade(&self, input: &GradeSubmission) -> Result<HttpRequest> {
        self.build_json_post("/teacher/grades", input)
    }

    /// Record a grade for a student in a class.
    pub async fn submit_grade(&self, input: &GradeSubmission) -> Result<Ack> {
        let request = self.build_submit_grade(input)?;
        let response = self.client.executor.execute(request).await?;
        Self::parse_ack(response)
    }

    pub fn build_send_message(&self, input: &MessageSubmission) -> Result<HttpRequest> {
        self.build_json_post("/teacher/messages", input)
    }

    /// Broadcast a message to every student in a class.
    pub async fn send_message(&self, input: &MessageSubmission) -> Result<Ack> {
        let request = self.build_send_message(input)?;
        let response = self.client.executor.execute(request).await?;
        Self::parse_ack(response)
    }
}
