// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::SearchFilter;
use url::Url;

/// 查询构造器
///
/// 把已校验的过滤条件编码成目录搜索页的规范定位器。
/// 参数的取名和顺序是目标站点决定的外部契约（query
/// schema v1），同一过滤条件必须产出同一定位器，下游
/// 可能按定位器做缓存。
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    /// 搜索页基础URL
    base_url: Url,
}

impl QueryBuilder {
    /// 创建新的查询构造器
    ///
    /// # 参数
    ///
    /// * `base_url` - 目录搜索页的基础URL
    ///
    /// # 返回值
    ///
    /// * `Ok(QueryBuilder)` - 构造器实例
    /// * `Err(url::ParseError)` - 基础URL非法
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
        })
    }

    /// 构造搜索定位器
    ///
    /// # 参数
    ///
    /// * `filter` - 已校验的过滤条件
    ///
    /// # 返回值
    ///
    /// 指向结果第一页的完整URL
    pub fn search_url(&self, filter: &SearchFilter) -> Url {
        let mut url = self.base_url.clone();
        {
            // Fixed parameter order: activite, region, etablissement, page
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.append_pair("activite", &filter.category_code);
            pairs.append_pair("region", &filter.region_code);
            if filter.primary_site_only {
                pairs.append_pair("etablissement", "siege");
            }
            pairs.append_pair("page", "1");
        }
        url
    }
}
