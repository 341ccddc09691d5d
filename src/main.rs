// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use sirenrs::config::settings::Settings;
use sirenrs::domain::services::job_service::JobService;
use sirenrs::domain::services::query_builder::QueryBuilder;
use sirenrs::domain::services::scrape_service::ScrapeService;
use sirenrs::engines::chromium_engine::ChromiumEngine;
use sirenrs::engines::politeness::PolitenessPolicy;
use sirenrs::engines::traits::DirectoryBrowser;
use sirenrs::infrastructure::database::connection;
use sirenrs::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
use sirenrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use sirenrs::presentation::routes;
use sirenrs::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting sirenrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let company_repo = Arc::new(CompanyRepositoryImpl::new(db.clone()));

    // 5. Initialize the browser engine and scrape pipeline
    let policy = PolitenessPolicy::new(&settings.scraper);
    let browser: Arc<dyn DirectoryBrowser> = Arc::new(ChromiumEngine::new(policy.clone()));
    let scraper = Arc::new(ScrapeService::new(policy, settings.scraper.max_pages));
    let query = QueryBuilder::new(&settings.directory.base_url)?;

    let job_service = Arc::new(JobService::new(
        job_repo,
        company_repo,
        browser,
        scraper,
        query,
    ));

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(job_service))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
