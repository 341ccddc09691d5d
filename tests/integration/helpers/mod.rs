// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fake_page;
pub mod memory_repos;

use sirenrs::domain::models::job::{JobStatus, ScrapeJob, SearchFilter};
use sirenrs::domain::repositories::company_repository::CompanyRepository;
use sirenrs::domain::repositories::job_repository::JobRepository;
use sirenrs::domain::services::job_service::JobService;
use std::time::Duration;
use uuid::Uuid;

/// Default filter used across the suite.
pub fn filter() -> SearchFilter {
    SearchFilter {
        category_code: "6201Z".to_string(),
        region_code: "75".to_string(),
        primary_site_only: false,
    }
}

/// A directory result page with one card per (name, siren) pair.
pub fn results_page(cards: &[(&str, &str)], total: i32, has_next: bool) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        r#"<span class="results-count">{} résultats</span>"#,
        total
    ));
    body.push_str(r#"<div class="results">"#);
    for (name, siren) in cards {
        body.push_str(&format!(
            r#"<article class="result-card">
                <h2 class="company-name">{}</h2>
                <span class="siren">{}</span>
                <span class="legal-form">SAS</span>
                <p class="address">1 rue Exemple, 75001 Paris</p>
            </article>"#,
            name, siren
        ));
    }
    body.push_str("</div>");
    if has_next {
        body.push_str(r##"<a class="next-page" href="#">Suivant</a>"##);
    } else {
        body.push_str(r##"<a class="next-page disabled" href="#">Suivant</a>"##);
    }
    format!("<html><body>{}</body></html>", body)
}

/// A directory page carrying the empty-result marker.
pub fn no_results_page() -> String {
    r#"<html><body><div id="no-results">Aucun résultat</div></body></html>"#.to_string()
}

/// A page whose results container renders but holds no parseable card.
pub fn unparseable_page() -> String {
    r#"<html><body><div class="results"><p>layout changed</p></div></body></html>"#.to_string()
}

/// Polls job status until it leaves the running states or the deadline hits.
pub async fn wait_until_terminal<J, C>(service: &JobService<J, C>, id: Uuid) -> ScrapeJob
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    for _ in 0..200 {
        let job = service.status(id).await.expect("job must exist");
        if matches!(job.status, JobStatus::Completed | JobStatus::Failed) {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not reach a terminal state in time", id);
}
