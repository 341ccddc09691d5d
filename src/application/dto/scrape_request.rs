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

use crate::domain::models::job::SearchFilter;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 抓取任务请求数据传输对象
///
/// 封装客户端发起的目录抓取请求的过滤条件。字段名与
/// 对外API保持camelCase，正则校验与领域层一致，非法
/// 请求在进入领域层之前就被拒绝。
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartScrapeRequestDto {
    /// 行业代码（NAF），例如 "6201Z"
    #[validate(custom(function = crate::utils::validators::validate_category_code))]
    pub category_code: String,
    /// 地区代码（省编号），例如 "75" 或 "2A"
    #[validate(custom(function = crate::utils::validators::validate_region_code))]
    pub region_code: String,
    /// 是否仅抓取总部机构，缺省为true
    #[serde(default = "default_primary_site_only")]
    pub primary_site_only: bool,
}

fn default_primary_site_only() -> bool {
    true
}

impl From<StartScrapeRequestDto> for SearchFilter {
    fn from(dto: StartScrapeRequestDto) -> Self {
        Self {
            category_code: dto.category_code,
            region_code: dto.region_code,
            primary_site_only: dto.primary_site_only,
        }
    }
}
