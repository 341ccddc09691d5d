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

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::dto::{
        scrape_request::StartScrapeRequestDto,
        scrape_response::{JobStatusResponseDto, StartScrapeResponseDto},
    },
    domain::repositories::{
        company_repository::CompanyRepository, job_repository::JobRepository,
    },
    domain::services::job_service::JobService,
    presentation::errors::AppError,
};

/// 启动抓取任务
///
/// 受理合法请求并立即返回202和任务ID，提取在后台任务中
/// 异步执行。
pub async fn start_scrape<J, C>(
    Extension(job_service): Extension<Arc<JobService<J, C>>>,
    Json(payload): Json<StartScrapeRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    payload.validate()?;

    let job_id = job_service.start(payload.into()).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(StartScrapeResponseDto { job_id }),
    ))
}

/// 查询抓取任务状态
pub async fn get_scrape_status<J, C>(
    Extension(job_service): Extension<Arc<JobService<J, C>>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let job = job_service.status(job_id).await?;
    Ok((StatusCode::OK, Json(JobStatusResponseDto::from(job))))
}

/// 停止抓取任务
///
/// 对运行中的任务发出取消信号，对已终止的任务为幂等
/// 空操作，未知ID返回404。
pub async fn stop_scrape<J, C>(
    Extension(job_service): Extension<Arc<JobService<J, C>>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    job_service.stop(job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
