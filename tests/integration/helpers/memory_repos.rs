// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::DbErr;
use sirenrs::domain::models::company::Company;
use sirenrs::domain::models::job::{JobStatus, ScrapeJob};
use sirenrs::domain::repositories::company_repository::CompanyRepository;
use sirenrs::domain::repositories::job_repository::{JobRepository, RepositoryError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Recorded progress write: (progress, found, processed).
pub type ProgressRow = (i32, i32, i32);

/// In-memory job store mirroring the SQL repository contract.
#[derive(Default)]
pub struct MemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, ScrapeJob>>,
    progress_log: Mutex<Vec<ProgressRow>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress_log(&self) -> Vec<ProgressRow> {
        self.progress_log.lock().clone()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &ScrapeJob) -> Result<(), RepositoryError> {
        self.jobs.lock().insert(job.id, job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
        Ok(self.jobs.lock().get(&id).cloned())
    }

    async fn update_progress(
        &self,
        id: Uuid,
        progress: i32,
        found: i32,
        processed: i32,
    ) -> Result<(), RepositoryError> {
        self.progress_log.lock().push((progress, found, processed));
        let mut jobs = self.jobs.lock();
        if let Some(job) = jobs.get_mut(&id) {
            // Same guard as the SQL implementation: terminal rows stay put.
            if job.status == JobStatus::Running {
                job.progress = progress;
                job.found_count = found;
                job.processed_count = processed;
            }
        }
        Ok(())
    }

    async fn finalize(&self, job: &ScrapeJob) -> Result<(), RepositoryError> {
        self.jobs.lock().insert(job.id, job.clone());
        Ok(())
    }
}

/// In-memory company store keyed by SIREN, last write wins.
#[derive(Default)]
pub struct MemoryCompanyRepository {
    companies: Mutex<HashMap<String, Company>>,
    fail_writes: AtomicBool,
}

impl MemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next upsert fail, to exercise the persist error path.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Company> {
        self.companies.lock().values().cloned().collect()
    }

    pub fn get(&self, siren: &str) -> Option<Company> {
        self.companies.lock().get(siren).cloned()
    }

    pub fn len(&self) -> usize {
        self.companies.lock().len()
    }
}

#[async_trait]
impl CompanyRepository for MemoryCompanyRepository {
    async fn upsert_all(&self, companies: &[Company]) -> Result<u64, RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(DbErr::Custom(
                "write refused".to_string(),
            )));
        }
        let mut store = self.companies.lock();
        for company in companies {
            store.insert(company.siren.clone(), company.clone());
        }
        Ok(companies.len() as u64)
    }
}
