// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::database::DatabaseConfig;
use crate::models::{Candidate, CandidatePayload};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::status::{BadRequest, Custom};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/candidates", data = "<payload>")]
pub async fn add_candidate(
    payload: Json<CandidatePayload>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<AddCandidateResponse>, BadRequest<Json<ErrorBody>>> {
    handlers::add_candidate_handler(payload, db_config).await
}

#[get("/candidates/<id>")]
pub async fn get_candidate(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Candidate>, Custom<Json<ErrorBody>>> {
    handlers::get_candidate_handler(id, db_config).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers: malformed or undeserializable bodies get the same uniform
// body the controller produces.
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new(
        "Error adding candidate",
        "Error: Invalid request body".to_string(),
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Custom<Json<ErrorBody>> {
    Custom(
        Status::BadRequest,
        Json(ErrorBody::new(
            "Error adding candidate",
            "Error: Invalid request body".to_string(),
        )),
    )
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new(
        "Internal server error",
        "Error: Internal server error".to_string(),
    ))
}

/// Assemble the rocket instance; separate from launch so tests can drive it
/// with a local client.
pub fn build_rocket(db_config: DatabaseConfig) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(db_config)
        .register("/", catchers![bad_request, unprocessable, internal_error])
        .mount(
            "/",
            routes![add_candidate, get_candidate, health, options],
        )
}

// Main server start function
pub async fn start_web_server(database_path: PathBuf, port: u16) -> Result<()> {
    let mut db_config = DatabaseConfig::new(database_path);

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    info!("Starting candidate intake API server");
    info!("Database: {}", db_config.database_path.display());

    let config = rocket::Config {
        address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        port,
        ..rocket::Config::default()
    };

    build_rocket(db_config)
        .configure(config)
        .launch()
        .await?;

    Ok(())
}
