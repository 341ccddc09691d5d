// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, EntityTrait};
use sirenrs::domain::models::company::Company;
use sirenrs::domain::models::job::{JobStatus, ScrapeJob};
use sirenrs::domain::repositories::company_repository::CompanyRepository;
use sirenrs::domain::repositories::job_repository::JobRepository;
use sirenrs::infrastructure::database::entities::company as company_entity;
use sirenrs::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
use sirenrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use std::sync::Arc;

use crate::helpers::filter;

async fn migrated_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Migrator::up(&db, None).await.expect("migrations apply");
    Arc::new(db)
}

fn company(name: &str, siren: &str) -> Company {
    Company {
        name: name.to_string(),
        siren: siren.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_upsert_collapses_repeated_siren_within_one_batch() {
    let db = migrated_db().await;
    let repo = CompanyRepositoryImpl::new(db.clone());

    // The same SIREN showing up on two pages of one run must not make
    // the single upsert statement touch its row twice.
    let batch = vec![
        company("Ancien Nom SAS", "510000001"),
        company("Autre SARL", "510000002"),
        company("Nouveau Nom SAS", "510000001"),
    ];
    let written = repo.upsert_all(&batch).await.unwrap();
    assert_eq!(written, 2);

    let row = company_entity::Entity::find_by_id("510000001")
        .one(db.as_ref())
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(row.name, "Nouveau Nom SAS");
}

#[tokio::test]
async fn test_upsert_overwrites_existing_rows_across_runs() {
    let db = migrated_db().await;
    let repo = CompanyRepositoryImpl::new(db.clone());

    repo.upsert_all(&[company("Première SAS", "520000001")])
        .await
        .unwrap();
    repo.upsert_all(&[company("Seconde SAS", "520000001")])
        .await
        .unwrap();

    let row = company_entity::Entity::find_by_id("520000001")
        .one(db.as_ref())
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(row.name, "Seconde SAS");
}

#[tokio::test]
async fn test_progress_writes_skip_terminal_rows() {
    let db = migrated_db().await;
    let repo = JobRepositoryImpl::new(db);

    let job = ScrapeJob::new(&filter()).start().unwrap();
    repo.create(&job).await.unwrap();

    repo.update_progress(job.id, 33, 6, 2).await.unwrap();
    let running = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(running.status, JobStatus::Running);
    assert_eq!(running.progress, 33);
    assert_eq!(running.found_count, 6);

    let done = running.complete(6, 6).unwrap();
    repo.finalize(&done).await.unwrap();

    // A straggling callback after the terminal write changes nothing.
    repo.update_progress(job.id, 66, 6, 4).await.unwrap();
    let stored = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.progress, 100);
    assert_eq!(stored.processed_count, 6);
    assert!(stored.completed_at.is_some());
}
