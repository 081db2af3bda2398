pub mod database;
pub mod environment;
pub mod error;
pub mod models;
pub mod service;
pub mod validation;
pub mod web;

pub use database::{CandidateRepository, CandidateStore, DatabaseConfig};
pub use error::IntakeError;
pub use service::CandidateService;
pub use web::{build_rocket, start_web_server};
