// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::fake_page::FakeDirectory;
use crate::helpers::memory_repos::{MemoryCompanyRepository, MemoryJobRepository};
use crate::helpers::{no_results_page, results_page};
use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use sirenrs::config::settings::ScraperSettings;
use sirenrs::domain::services::job_service::JobService;
use sirenrs::domain::services::query_builder::QueryBuilder;
use sirenrs::domain::services::scrape_service::ScrapeService;
use sirenrs::engines::politeness::PolitenessPolicy;
use sirenrs::engines::traits::DirectoryBrowser;
use sirenrs::presentation::handlers::scrape_handler;
use sirenrs::presentation::routes;
use std::sync::Arc;
use std::time::Duration;

fn test_server(pages: Vec<String>) -> TestServer {
    let settings = ScraperSettings {
        page_delay_ms: 0,
        nav_timeout_ms: 1000,
        user_agent: "SirenRs/test".to_string(),
        max_pages: 200,
    };
    let browser: Arc<dyn DirectoryBrowser> = Arc::new(FakeDirectory::new(pages));
    let jobs = Arc::new(MemoryJobRepository::new());
    let companies = Arc::new(MemoryCompanyRepository::new());
    let policy = PolitenessPolicy::new(&settings);
    let scraper = Arc::new(ScrapeService::new(policy, settings.max_pages));
    let query = QueryBuilder::new("https://directory.test/rechercher").unwrap();
    let job_service = Arc::new(JobService::new(jobs, companies, browser, scraper, query));

    let app = Router::new()
        .route("/health", get(routes::health_check))
        .route("/v1/version", get(routes::version))
        .route(
            "/v1/scrape",
            post(scrape_handler::start_scrape::<MemoryJobRepository, MemoryCompanyRepository>),
        )
        .route(
            "/v1/scrape/{id}",
            get(scrape_handler::get_scrape_status::<
                MemoryJobRepository,
                MemoryCompanyRepository,
            >),
        )
        .route(
            "/v1/scrape/{id}",
            delete(scrape_handler::stop_scrape::<MemoryJobRepository, MemoryCompanyRepository>),
        )
        .layer(Extension(job_service));

    TestServer::new(app).unwrap()
}

async fn poll_until_done(server: &TestServer, job_id: &str) -> Value {
    for _ in 0..200 {
        let body: Value = server
            .get(&format!("/v1/scrape/{}", job_id))
            .await
            .json::<Value>();
        let status = body["status"].as_str().unwrap().to_string();
        if status == "completed" || status == "failed" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal state", job_id);
}

#[tokio::test]
async fn test_health_and_version() {
    let server = test_server(vec![no_results_page()]);

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");

    let response = server.get("/v1/version").await;
    response.assert_status_ok();
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn test_start_returns_202_with_job_id() {
    let server = test_server(vec![no_results_page()]);

    let response = server
        .post("/v1/scrape")
        .json(&json!({"categoryCode": "6201Z", "regionCode": "75"}))
        .await;

    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let body: Value = response.json();
    assert!(body["jobId"].as_str().is_some());
}

#[tokio::test]
async fn test_malformed_filter_returns_400() {
    let server = test_server(vec![no_results_page()]);

    let response = server
        .post("/v1/scrape")
        .json(&json!({"categoryCode": "informatique", "regionCode": "75"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let response = server
        .post("/v1/scrape")
        .json(&json!({"categoryCode": "6201Z", "regionCode": "2C"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_of_unknown_job_returns_404() {
    let server = test_server(vec![no_results_page()]);

    let response = server
        .get("/v1/scrape/00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_scrape_flow_over_http() {
    let pages = vec![
        results_page(&[("Alpha SAS", "100000001")], 2, true),
        results_page(&[("Beta SARL", "100000002")], 2, false),
    ];
    let server = test_server(pages);

    let response = server
        .post("/v1/scrape")
        .json(&json!({"categoryCode": "6201Z", "regionCode": "75", "primarySiteOnly": true}))
        .await;
    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let job_id = response.json::<Value>()["jobId"]
        .as_str()
        .unwrap()
        .to_string();

    let body = poll_until_done(&server, &job_id).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["progress"], 100);
    assert_eq!(body["foundCount"], 2);
    assert_eq!(body["processedCount"], 2);
    assert!(body.get("errorMessage").is_none());

    // Stopping a finished job is a no-op and still answers 204.
    let response = server.delete(&format!("/v1/scrape/{}", job_id)).await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_stop_unknown_job_returns_404() {
    let server = test_server(vec![no_results_page()]);

    let response = server
        .delete("/v1/scrape/00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}
