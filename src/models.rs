// src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Raw JSON body of a candidate submission. Every field is optional at the
/// wire level; the validator decides what is actually required so that a
/// missing field surfaces as a field-rule error rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub educations: Vec<EducationPayload>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperiencePayload>,
    pub cv: Option<ResumePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    pub institution: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperiencePayload {
    pub company: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    pub file_path: Option<String>,
    pub file_type: Option<String>,
}

/// A candidate that has passed validation: required fields present, dates
/// parsed. This is what the store persists.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub educations: Vec<NewEducation>,
    pub work_experiences: Vec<NewWorkExperience>,
    pub resume: Option<NewResume>,
}

#[derive(Debug, Clone)]
pub struct NewEducation {
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewWorkExperience {
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub file_path: String,
    pub file_type: String,
}

/// A persisted candidate with its owned records, as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub educations: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
    pub resumes: Vec<Resume>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: i64,
    pub candidate_id: i64,
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: i64,
    pub candidate_id: i64,
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: i64,
    pub candidate_id: i64,
    pub file_path: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
}
