// src/database.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};
use std::path::PathBuf;
use tracing::info;

use crate::error::{classify_storage_error, IntakeError};
use crate::models::{Candidate, Education, NewCandidate, Resume, WorkExperience};

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Wrap an already-connected pool, e.g. an in-memory database in tests.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS candidates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT,
                address TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS educations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                candidate_id INTEGER NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
                institution TEXT NOT NULL,
                title TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS work_experiences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                candidate_id INTEGER NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
                company TEXT NOT NULL,
                position TEXT NOT NULL,
                description TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                candidate_id INTEGER NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
                file_path TEXT NOT NULL,
                file_type TEXT NOT NULL,
                upload_date TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Index on email for the uniqueness lookup path
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_candidates_email
            ON candidates(email);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Storage capability for candidates. Entities stay plain data; persistence
/// goes through this seam so the service can be exercised against a fake.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn create(&self, candidate: &NewCandidate) -> Result<Candidate, IntakeError>;
    async fn update(&self, id: i64, candidate: &NewCandidate) -> Result<Candidate, IntakeError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Candidate>, IntakeError>;
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub struct CandidateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CandidateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    async fn load(&self, id: i64) -> Result<Option<Candidate>, IntakeError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, first_name, last_name, email, phone, address, created_at, updated_at
            FROM candidates
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(classify_storage_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let educations = sqlx::query_as::<_, Education>(
            r#"
            SELECT id, candidate_id, institution, title, start_date, end_date
            FROM educations
            WHERE candidate_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(classify_storage_error)?;

        let work_experiences = sqlx::query_as::<_, WorkExperience>(
            r#"
            SELECT id, candidate_id, company, position, description, start_date, end_date
            FROM work_experiences
            WHERE candidate_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(classify_storage_error)?;

        let resumes = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, candidate_id, file_path, file_type, upload_date
            FROM resumes
            WHERE candidate_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(classify_storage_error)?;

        Ok(Some(Candidate {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
            educations,
            work_experiences,
            resumes,
        }))
    }

    async fn insert_children(
        tx: &mut Transaction<'_, Sqlite>,
        candidate_id: i64,
        candidate: &NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<(), IntakeError> {
        for education in &candidate.educations {
            sqlx::query(
                r#"
                INSERT INTO educations (candidate_id, institution, title, start_date, end_date)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(candidate_id)
            .bind(&education.institution)
            .bind(&education.title)
            .bind(education.start_date)
            .bind(education.end_date)
            .execute(&mut **tx)
            .await
            .map_err(classify_storage_error)?;
        }

        for experience in &candidate.work_experiences {
            sqlx::query(
                r#"
                INSERT INTO work_experiences (candidate_id, company, position, description, start_date, end_date)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(candidate_id)
            .bind(&experience.company)
            .bind(&experience.position)
            .bind(&experience.description)
            .bind(experience.start_date)
            .bind(experience.end_date)
            .execute(&mut **tx)
            .await
            .map_err(classify_storage_error)?;
        }

        if let Some(resume) = &candidate.resume {
            sqlx::query(
                r#"
                INSERT INTO resumes (candidate_id, file_path, file_type, upload_date)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(candidate_id)
            .bind(&resume.file_path)
            .bind(&resume.file_type)
            .bind(now)
            .execute(&mut **tx)
            .await
            .map_err(classify_storage_error)?;
        }

        Ok(())
    }
}

#[async_trait]
impl CandidateStore for CandidateRepository<'_> {
    /// Insert a candidate and its owned records in one transaction.
    async fn create(&self, candidate: &NewCandidate) -> Result<Candidate, IntakeError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(classify_storage_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO candidates (first_name, last_name, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&candidate.first_name)
        .bind(&candidate.last_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.address)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(classify_storage_error)?;

        let candidate_id = result.last_insert_rowid();
        Self::insert_children(&mut tx, candidate_id, candidate, now).await?;
        tx.commit().await.map_err(classify_storage_error)?;

        info!("Created candidate {} ({})", candidate_id, candidate.email);

        self.load(candidate_id)
            .await?
            .ok_or(IntakeError::Storage(sqlx::Error::RowNotFound))
    }

    /// Update the candidate row and replace its owned records. The education,
    /// work experience and resume rows are compositions, so the stored set
    /// mirrors the submitted set after every update.
    async fn update(&self, id: i64, candidate: &NewCandidate) -> Result<Candidate, IntakeError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(classify_storage_error)?;

        let result = sqlx::query(
            r#"
            UPDATE candidates
            SET first_name = ?, last_name = ?, email = ?, phone = ?, address = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&candidate.first_name)
        .bind(&candidate.last_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.address)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(classify_storage_error)?;

        if result.rows_affected() == 0 {
            return Err(IntakeError::NotFound);
        }

        for table in ["educations", "work_experiences", "resumes"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE candidate_id = ?"))
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(classify_storage_error)?;
        }

        Self::insert_children(&mut tx, id, candidate, now).await?;
        tx.commit().await.map_err(classify_storage_error)?;

        info!("Updated candidate {} ({})", id, candidate.email);

        self.load(id)
            .await?
            .ok_or(IntakeError::Storage(sqlx::Error::RowNotFound))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Candidate>, IntakeError> {
        self.load(id).await
    }
}
