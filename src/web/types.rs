// src/web/types.rs
use serde::Serialize;

use crate::error::IntakeError;
use crate::models::Candidate;

#[derive(Debug, Serialize)]
pub struct AddCandidateResponse {
    pub message: String,
    pub data: Candidate,
}

impl AddCandidateResponse {
    pub fn added(data: Candidate) -> Self {
        Self {
            message: "Candidate added successfully".to_string(),
            data,
        }
    }
}

/// Uniform failure body. The `error` field carries the stringified error with
/// the `Error: ` prefix the wire contract fixes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}

impl ErrorBody {
    pub fn adding_candidate(err: &IntakeError) -> Self {
        Self {
            message: "Error adding candidate".to_string(),
            error: format!("Error: {err}"),
        }
    }

    pub fn new(message: &str, error: String) -> Self {
        Self {
            message: message.to_string(),
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
