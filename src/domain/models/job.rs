// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::validators;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 抓取任务实体
///
/// 表示一次目录抓取任务的完整信息，包含过滤条件、
/// 执行状态、进度统计和生命周期时间戳。
/// 状态转换是单向且单调的，终止状态不会再变化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 行业代码（NAF），例如 "6201Z"
    pub category_code: String,
    /// 地区代码（省编号），例如 "75"
    pub region_code: String,
    /// 是否仅抓取总部机构
    pub primary_site_only: bool,
    /// 任务状态，跟踪任务在其生命周期中的当前阶段
    pub status: JobStatus,
    /// 进度百分比（0-100），运行期间单调不减
    pub progress: i32,
    /// 目录页面报告的结果总数（尽力而为，可能为0）
    pub found_count: i32,
    /// 已提取的记录数
    pub processed_count: i32,
    /// 错误信息，仅在任务失败时存在
    pub error_message: Option<String>,
    /// 开始时间，任务创建并启动的时间戳
    pub started_at: DateTime<Utc>,
    /// 完成时间，任务到达终止状态的时间戳
    pub completed_at: Option<DateTime<Utc>>,
}

/// 抓取过滤条件
///
/// 行业代码和地区代码为必填项，是构造搜索定位器的
/// 两个维度；primary_site_only 限定只返回总部机构。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilter {
    /// 行业代码（NAF）
    pub category_code: String,
    /// 地区代码
    pub region_code: String,
    /// 是否仅抓取总部机构
    pub primary_site_only: bool,
}

impl SearchFilter {
    /// 校验过滤条件
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 过滤条件合法
    /// * `Err(DomainError)` - 行业代码或地区代码缺失/格式错误
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.category_code.is_empty() {
            return Err(DomainError::ValidationError(
                "categoryCode is required".to_string(),
            ));
        }
        if self.region_code.is_empty() {
            return Err(DomainError::ValidationError(
                "regionCode is required".to_string(),
            ));
        }
        if !validators::is_valid_category_code(&self.category_code) {
            return Err(DomainError::ValidationError(format!(
                "invalid categoryCode: {}",
                self.category_code
            )));
        }
        if !validators::is_valid_region_code(&self.region_code) {
            return Err(DomainError::ValidationError(format!(
                "invalid regionCode: {}",
                self.region_code
            )));
        }
        Ok(())
    }
}

/// 任务状态枚举
///
/// 表示抓取任务在其生命周期中的不同状态。
/// 状态转换遵循以下流程：
/// Pending → Running → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 待启动，任务已创建但后台任务尚未开始
    #[default]
    Pending,
    /// 运行中，后台任务正在提取页面
    Running,
    /// 已完成，所有页面提取成功
    Completed,
    /// 已失败，提取出错或被操作员取消
    Failed,
}

impl JobStatus {
    /// 判断是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
///
/// 表示在领域层可能发生的各种错误情况，包括状态转换错误
/// 和过滤条件校验失败。
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，终止状态的任务不允许再变更
    #[error("Invalid state transition")]
    InvalidStateTransition,

    /// 验证错误，当过滤条件不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ScrapeJob {
    /// 创建一个新的抓取任务
    ///
    /// # 参数
    ///
    /// * `filter` - 抓取过滤条件
    ///
    /// # 返回值
    ///
    /// 返回新创建的任务实例，初始状态为Pending
    pub fn new(filter: &SearchFilter) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_code: filter.category_code.clone(),
            region_code: filter.region_code.clone(),
            primary_site_only: filter.primary_site_only,
            status: JobStatus::Pending,
            progress: 0,
            found_count: 0,
            processed_count: 0,
            error_message: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// 启动任务
    ///
    /// 将任务状态从Pending变更为Running
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJob)` - 成功启动的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Pending => {
                self.status = JobStatus::Running;
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成任务
    ///
    /// 将任务状态从Running变更为Completed，进度固定为100
    ///
    /// # 参数
    ///
    /// * `found` - 目录报告的结果总数
    /// * `processed` - 实际提取的记录数
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJob)` - 成功完成的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn complete(mut self, found: i32, processed: i32) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Running => {
                self.status = JobStatus::Completed;
                self.progress = 100;
                self.found_count = found;
                self.processed_count = processed;
                self.completed_at = Some(Utc::now());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记任务失败
    ///
    /// 将任务状态变更为Failed并记录错误信息
    ///
    /// # 参数
    ///
    /// * `message` - 人类可读的失败原因
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJob)` - 失败的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn fail(mut self, message: String) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Pending | JobStatus::Running => {
                self.status = JobStatus::Failed;
                self.error_message = Some(message);
                self.completed_at = Some(Utc::now());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }
}
