// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::ScrapeJob;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Not found")]
    NotFound,
}

/// 抓取任务仓库特质
///
/// 定义抓取任务数据访问接口，提供任务行的创建、查询和
/// 终止状态写入。该特质遵循依赖倒置原则，确保领域层
/// 不依赖于具体的数据存储实现。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建抓取任务行
    ///
    /// # 参数
    ///
    /// * `job` - 要持久化的任务实体
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 成功创建
    /// * `Err(RepositoryError)` - 创建失败时返回错误
    async fn create(&self, job: &ScrapeJob) -> Result<(), RepositoryError>;

    /// 根据ID查找抓取任务
    ///
    /// # 参数
    ///
    /// * `id` - 任务的唯一标识符
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(ScrapeJob))` - 找到任务时返回任务实体
    /// * `Ok(None)` - 未找到任务时返回空
    /// * `Err(RepositoryError)` - 查询失败时返回错误
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError>;

    /// 更新任务进度
    ///
    /// 在提取循环运行期间按页写入进度、总数和已处理数。
    ///
    /// # 参数
    ///
    /// * `id` - 任务的唯一标识符
    /// * `progress` - 进度百分比（0-100）
    /// * `found` - 目录报告的结果总数
    /// * `processed` - 已提取的记录数
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 成功更新
    /// * `Err(RepositoryError)` - 更新失败时返回错误
    async fn update_progress(
        &self,
        id: Uuid,
        progress: i32,
        found: i32,
        processed: i32,
    ) -> Result<(), RepositoryError>;

    /// 将任务写入终止状态
    ///
    /// 状态、进度、计数、错误信息和完成时间在一次更新中
    /// 原子写入，每条退出路径都必须经过此方法。
    ///
    /// # 参数
    ///
    /// * `job` - 携带终止状态的任务实体
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 成功写入
    /// * `Err(RepositoryError)` - 写入失败时返回错误
    async fn finalize(&self, job: &ScrapeJob) -> Result<(), RepositoryError>;
}
