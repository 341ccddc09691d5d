// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::job_repository::RepositoryError;
use crate::domain::models::company::Company;
use async_trait::async_trait;

/// 企业记录仓库特质
///
/// 定义企业记录的批量写入接口。冲突键为SIREN，
/// 冲突时采用后写覆盖（last-write-wins）。
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// 批量插入或更新企业记录
    ///
    /// # 参数
    ///
    /// * `companies` - 要持久化的企业记录列表
    ///
    /// # 返回值
    ///
    /// * `Ok(u64)` - 写入的记录数
    /// * `Err(RepositoryError)` - 写入失败时返回错误
    async fn upsert_all(&self, companies: &[Company]) -> Result<u64, RepositoryError>;
}
