// src/service.rs
use tracing::{error, info, warn};

use crate::database::CandidateStore;
use crate::error::IntakeError;
use crate::models::{Candidate, CandidatePayload};
use crate::validation;

/// Orchestrates validation and persistence. Storage errors arrive already
/// classified by the repository's translation step and are propagated
/// untouched; validation errors propagate unchanged.
pub struct CandidateService<S: CandidateStore> {
    store: S,
}

impl<S: CandidateStore> CandidateService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate the payload, then create the candidate, or update it when the
    /// payload carries an id. Exactly one store write per call.
    pub async fn add_candidate(&self, payload: &CandidatePayload) -> Result<Candidate, IntakeError> {
        let candidate = validation::validate(payload).map_err(|e| {
            warn!("Candidate payload rejected: {}", e);
            e
        })?;

        let result = match payload.id {
            Some(id) => {
                if self.store.find_by_id(id).await?.is_none() {
                    warn!("Update requested for unknown candidate {}", id);
                    return Err(IntakeError::NotFound);
                }
                info!("Updating candidate {} ({})", id, candidate.email);
                self.store.update(id, &candidate).await
            }
            None => {
                info!("Creating candidate ({})", candidate.email);
                self.store.create(&candidate).await
            }
        };

        if let Err(e) = &result {
            error!("Failed to persist candidate ({}): {}", candidate.email, e);
        }
        result
    }

    pub async fn find_candidate(&self, id: i64) -> Result<Option<Candidate>, IntakeError> {
        self.store.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCandidate;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Store fake that counts writes and can be primed to fail or to know
    /// about one existing candidate.
    #[derive(Default)]
    struct FakeStore {
        creates: AtomicUsize,
        updates: AtomicUsize,
        fail_next: Mutex<Option<IntakeError>>,
        existing_id: Option<i64>,
    }

    fn persisted(id: i64, candidate: &NewCandidate) -> Candidate {
        let now = Utc::now();
        Candidate {
            id,
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            address: candidate.address.clone(),
            created_at: now,
            updated_at: now,
            educations: Vec::new(),
            work_experiences: Vec::new(),
            resumes: Vec::new(),
        }
    }

    fn blank(id: i64) -> Candidate {
        let now = Utc::now();
        Candidate {
            id,
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
            educations: Vec::new(),
            work_experiences: Vec::new(),
            resumes: Vec::new(),
        }
    }

    #[async_trait]
    impl CandidateStore for FakeStore {
        async fn create(&self, candidate: &NewCandidate) -> Result<Candidate, IntakeError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_next.lock().unwrap().take() {
                return Err(err);
            }
            Ok(persisted(1, candidate))
        }

        async fn update(&self, id: i64, candidate: &NewCandidate) -> Result<Candidate, IntakeError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_next.lock().unwrap().take() {
                return Err(err);
            }
            Ok(persisted(id, candidate))
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Candidate>, IntakeError> {
            Ok(self.existing_id.filter(|known| *known == id).map(blank))
        }
    }

    fn valid_payload() -> CandidatePayload {
        CandidatePayload {
            first_name: Some("Ana".to_string()),
            last_name: Some("Ruiz".to_string()),
            email: Some("ana@example.com".to_string()),
            phone: Some("612345678".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn valid_payload_creates_exactly_once() {
        let service = CandidateService::new(FakeStore::default());
        let candidate = service.add_candidate(&valid_payload()).await.unwrap();
        assert_eq!(candidate.id, 1);
        assert_eq!(candidate.email, "ana@example.com");
        assert_eq!(service.store.creates.load(Ordering::SeqCst), 1);
        assert_eq!(service.store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_store() {
        let service = CandidateService::new(FakeStore::default());
        let mut payload = valid_payload();
        payload.first_name = Some(String::new());
        let err = service.add_candidate(&payload).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid name");
        assert_eq!(service.store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn duplicate_email_surfaces_fixed_message() {
        let store = FakeStore::default();
        *store.fail_next.lock().unwrap() = Some(IntakeError::DuplicateEmail);
        let service = CandidateService::new(store);
        let err = service.add_candidate(&valid_payload()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "The email already exists in the database"
        );
    }

    #[tokio::test]
    async fn connectivity_failure_surfaces_unchanged() {
        let store = FakeStore::default();
        *store.fail_next.lock().unwrap() = Some(IntakeError::Connectivity);
        let service = CandidateService::new(store);
        let err = service.add_candidate(&valid_payload()).await.unwrap_err();
        assert!(matches!(err, IntakeError::Connectivity));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let service = CandidateService::new(FakeStore::default());
        let mut payload = valid_payload();
        payload.id = Some(42);
        let err = service.add_candidate(&payload).await.unwrap_err();
        assert!(matches!(err, IntakeError::NotFound));
        assert_eq!(service.store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_of_known_id_writes_once() {
        let store = FakeStore {
            existing_id: Some(7),
            ..Default::default()
        };
        let service = CandidateService::new(store);
        let mut payload = valid_payload();
        payload.id = Some(7);
        let candidate = service.add_candidate(&payload).await.unwrap();
        assert_eq!(candidate.id, 7);
        assert_eq!(service.store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(service.store.creates.load(Ordering::SeqCst), 0);
    }
}
