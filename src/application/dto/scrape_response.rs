// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::ScrapeJob;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 抓取任务受理响应数据传输对象
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartScrapeResponseDto {
    /// 新任务的唯一标识符
    pub job_id: Uuid,
}

/// 抓取任务状态响应数据传输对象
///
/// 任务行在对外API上的只读快照
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponseDto {
    /// 任务唯一标识符
    pub job_id: Uuid,
    /// 任务状态（pending/running/completed/failed）
    pub status: String,
    /// 进度百分比（0-100）
    pub progress: i32,
    /// 目录报告的结果总数
    pub found_count: i32,
    /// 已提取的记录数
    pub processed_count: i32,
    /// 错误信息，仅在任务失败时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// 任务开始时间
    pub started_at: DateTime<Utc>,
    /// 任务完成时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ScrapeJob> for JobStatusResponseDto {
    fn from(job: ScrapeJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status.to_string(),
            progress: job.progress,
            found_count: job.found_count,
            processed_count: job.processed_count,
            error_message: job.error_message,
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}
