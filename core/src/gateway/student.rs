//! Student gateway: bearer-authenticated reads.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Result;
use crate::gateway::parse_json;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Material, Message, Subject};

/// Read operations on `/student/*`. Each response arrives in a
/// `{success, <key>: [...]}` envelope and is unwrapped to the inner list.
#[derive(Debug, Clone, Copy)]
pub struct StudentGateway<'a> {
    pub(crate) client: &'a ApiClient,
}

#[derive(Deserialize)]
struct SubjectsEnvelope {
    subjects: Vec<Subject>,
}

#[derive(Deserialize)]
struct MaterialsEnvelope {
    materials: Vec<Material>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    messages: Vec<Message>,
}

impl StudentGateway<'_> {
    fn build_read(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.client.config.endpoint(path),
            headers: self.client.session.auth_header(),
            body: None,
        }
    }

    pub fn build_subjects(&self) -> HttpRequest {
        self.build_read("/student/subjects")
    }

    pub fn parse_subjects(response: HttpResponse) -> Result<Vec<Subject>> {
        parse_json::<SubjectsEnvelope>(response).map(|envelope| envelope.subjects)
    }

    /// The student's subjects with current grades.
    pub async fn subjects(&self) -> Result<Vec<Subject>> {
        let response = self.client.executor.execute(self.build_subjects()).await?;
        Self::parse_subjects(response)
    }

    pub fn build_materials(&self) -> HttpRequest {
        self.build_read("/student/materials")
    }

    pub fn parse_materials(response: HttpResponse) -> Result<Vec<Material>> {
        parse_json::<MaterialsEnvelope>(response).map(|envelope| envelope.materials)
    }

    /// Downloadable materials shared with the student.
    pub async fn materials(&self) -> Result<Vec<Material>> {
        let response = self.client.executor.execute(self.build_materials()).await?;
        Self::parse_materials(response)
    }

    pub fn build_messages(&self) -> HttpRequest {
        self.build_read("/student/messages")
    }

    pub fn parse_messages(response: HttpResponse) -> Result<Vec<Message>> {
        parse_json::<MessagesEnvelope>(response).map(|envelope| envelope.messages)
    }

    /// Messages sent to the student by teachers.
    pub async fn messages(&self) -> Result<Vec<Message>> {
        let response = self.client.executor.execute(self.build_messages()).await?;
        Self::parse_messages(response)
    }
}
