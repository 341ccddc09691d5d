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

use crate::domain::models::job::{JobStatus, ScrapeJob};
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::infrastructure::database::entities::scrape_job as job_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for ScrapeJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            category_code: model.category_code,
            region_code: model.region_code,
            primary_site_only: model.primary_site_only,
            status: model.status.parse().unwrap_or_default(),
            progress: model.progress,
            found_count: model.found_count,
            processed_count: model.processed_count,
            error_message: model.error_message,
            started_at: model.started_at,
            completed_at: model.completed_at,
        }
    }
}

impl From<&ScrapeJob> for job_entity::ActiveModel {
    fn from(job: &ScrapeJob) -> Self {
        Self {
            id: Set(job.id),
            category_code: Set(job.category_code.clone()),
            region_code: Set(job.region_code.clone()),
            primary_site_only: Set(job.primary_site_only),
            status: Set(job.status.to_string()),
            progress: Set(job.progress),
            found_count: Set(job.found_count),
            processed_count: Set(job.processed_count),
            error_message: Set(job.error_message.clone()),
            started_at: Set(job.started_at),
            completed_at: Set(job.completed_at),
        }
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(&self, job: &ScrapeJob) -> Result<(), RepositoryError> {
        let model: job_entity::ActiveModel = job.into();

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update_progress(
        &self,
        id: Uuid,
        progress: i32,
        found: i32,
        processed: i32,
    ) -> Result<(), RepositoryError> {
        // A progress write racing the terminal write must never
        // reopen a finished job, so only running rows are touched.
        job_entity::Entity::update_many()
            .col_expr(job_entity::Column::Progress, Expr::value(progress))
            .col_expr(job_entity::Column::FoundCount, Expr::value(found))
            .col_expr(job_entity::Column::ProcessedCount, Expr::value(processed))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Running.to_string()))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn finalize(&self, job: &ScrapeJob) -> Result<(), RepositoryError> {
        // Single statement: status, counters, error and completion
        // timestamp land together.
        job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(job.status.to_string()),
            )
            .col_expr(job_entity::Column::Progress, Expr::value(job.progress))
            .col_expr(job_entity::Column::FoundCount, Expr::value(job.found_count))
            .col_expr(
                job_entity::Column::ProcessedCount,
                Expr::value(job.processed_count),
            )
            .col_expr(
                job_entity::Column::ErrorMessage,
                Expr::value(job.error_message.clone()),
            )
            .col_expr(
                job_entity::Column::CompletedAt,
                Expr::value(job.completed_at),
            )
            .filter(job_entity::Column::Id.eq(job.id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
