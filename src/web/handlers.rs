// src/web/handlers.rs
use rocket::http::Status;
use rocket::response::status::{BadRequest, Custom};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::database::{CandidateRepository, DatabaseConfig};
use crate::error::IntakeError;
use crate::models::{Candidate, CandidatePayload};
use crate::service::CandidateService;
use crate::web::types::{AddCandidateResponse, ErrorBody, HealthResponse};

/// Controller for candidate submission. Every failure on this path, whether
/// a field rule or a persistence problem, becomes a 400 with the uniform
/// error body.
pub async fn add_candidate_handler(
    payload: Json<CandidatePayload>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<AddCandidateResponse>, BadRequest<Json<ErrorBody>>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(BadRequest(Json(ErrorBody::adding_candidate(
                &IntakeError::Connectivity,
            ))));
        }
    };

    let service = CandidateService::new(CandidateRepository::new(pool));
    match service.add_candidate(&payload).await {
        Ok(candidate) => Ok(Json(AddCandidateResponse::added(candidate))),
        Err(e) => Err(BadRequest(Json(ErrorBody::adding_candidate(&e)))),
    }
}

pub async fn get_candidate_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Candidate>, Custom<Json<ErrorBody>>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Custom(
                Status::BadRequest,
                Json(ErrorBody::new(
                    "Error fetching candidate",
                    format!("Error: {}", IntakeError::Connectivity),
                )),
            ));
        }
    };

    let service = CandidateService::new(CandidateRepository::new(pool));
    match service.find_candidate(id).await {
        Ok(Some(candidate)) => Ok(Json(candidate)),
        Ok(None) => Err(Custom(
            Status::NotFound,
            Json(ErrorBody::new(
                "Candidate not found",
                format!("Error: {}", IntakeError::NotFound),
            )),
        )),
        Err(e) => {
            error!("Error fetching candidate {}: {}", id, e);
            Err(Custom(
                Status::BadRequest,
                Json(ErrorBody::new("Error fetching candidate", format!("Error: {e}"))),
            ))
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
