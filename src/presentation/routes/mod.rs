// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
use crate::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use crate::presentation::handlers::scrape_handler;
use axum::{
    routing::{delete, get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let scrape_routes = Router::new()
        .route(
            "/v1/scrape",
            post(scrape_handler::start_scrape::<JobRepositoryImpl, CompanyRepositoryImpl>),
        )
        .route(
            "/v1/scrape/{id}",
            get(scrape_handler::get_scrape_status::<JobRepositoryImpl, CompanyRepositoryImpl>),
        )
        .route(
            "/v1/scrape/{id}",
            delete(scrape_handler::stop_scrape::<JobRepositoryImpl, CompanyRepositoryImpl>),
        );

    Router::new().merge(public_routes).merge(scrape_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
