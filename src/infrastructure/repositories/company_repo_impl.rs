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

use crate::domain::models::company::Company;
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::job_repository::RepositoryError;
use crate::infrastructure::database::entities::company as company_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, Set};
use std::collections::HashMap;
use std::sync::Arc;

/// 企业记录仓库实现
///
/// 基于SeaORM实现的企业记录批量写入，SIREN冲突时
/// 采用后写覆盖。
#[derive(Clone)]
pub struct CompanyRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CompanyRepositoryImpl {
    /// 创建新的企业记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的企业记录仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<&Company> for company_entity::ActiveModel {
    fn from(company: &Company) -> Self {
        Self {
            siren: Set(company.siren.clone()),
            name: Set(company.name.clone()),
            activity_started_on: Set(company.activity_started_on),
            representatives: Set(serde_json::json!(company.representatives)),
            legal_form: Set(company.legal_form.clone()),
            establishment_count: Set(company.establishment_count),
            postal_code: Set(company.postal_code.clone()),
            city: Set(company.city.clone()),
            street: Set(company.street.clone()),
            status: Set(company.status.clone()),
            updated_at: Set(Utc::now()),
        }
    }
}

#[async_trait]
impl CompanyRepository for CompanyRepositoryImpl {
    async fn upsert_all(&self, companies: &[Company]) -> Result<u64, RepositoryError> {
        if companies.is_empty() {
            return Ok(0);
        }

        // The whole run goes out as one statement; Postgres rejects an
        // ON CONFLICT DO UPDATE that touches the same row twice, so a
        // SIREN seen on two pages must collapse to its last occurrence
        // before the models are built.
        let mut deduped: HashMap<&str, &Company> = HashMap::new();
        for company in companies {
            deduped.insert(company.siren.as_str(), company);
        }

        let written = deduped.len() as u64;
        let models: Vec<company_entity::ActiveModel> =
            deduped.into_values().map(Into::into).collect();

        company_entity::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(company_entity::Column::Siren)
                    .update_columns([
                        company_entity::Column::Name,
                        company_entity::Column::ActivityStartedOn,
                        company_entity::Column::Representatives,
                        company_entity::Column::LegalForm,
                        company_entity::Column::EstablishmentCount,
                        company_entity::Column::PostalCode,
                        company_entity::Column::City,
                        company_entity::Column::Street,
                        company_entity::Column::Status,
                        company_entity::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(written)
    }
}
