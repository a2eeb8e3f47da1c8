//! Request and response bodies of the pipeline service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlesRequest {
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Quadrants {
    #[serde(default)]
    pub behavior: Vec<String>,
    #[serde(default)]
    pub emotion: Vec<String>,
    #[serde(default)]
    pub mechanism: Vec<String>,
    #[serde(default)]
    pub philosophy: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TitlesResponse {
    #[serde(default)]
    pub quadrants: Quadrants,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub voices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AuthorsResponse {
    #[serde(default)]
    pub authors: Vec<AuthorDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddAuthorRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voices: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoicesResponse {
    pub author: String,
    #[serde(default)]
    pub voices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStartRequest {
    pub title: String,
    pub author: String,
    pub voice: String,
    pub primary_intent: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_intents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineStartResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PipelineStage {
    Init,
    P1,
    P2,
    P3,
    P4,
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PipelineState {
    Pending,
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineStatusResponse {
    pub job_id: String,
    pub stage: PipelineStage,
    pub status: PipelineState,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineResultResponse {
    pub job_id: String,
    pub title: String,
    pub final_a: String,
    pub final_b: String,
    #[serde(default)]
    pub variants: Option<serde_json::Value>,
}
