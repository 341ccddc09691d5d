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
use crate::domain::services::extraction_service::{
    ExtractionService, NEXT_PAGE_SELECTOR, NO_RESULTS_SELECTOR, RESULTS_CONTAINER_SELECTOR,
};
use crate::engines::politeness::PolitenessPolicy;
use crate::engines::traits::{DirectoryPage, EngineError};
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// 进度报告
///
/// 每提取完一页回调一次，完成时再回调一次。百分比在
/// 到达Done之前封顶为90。
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    /// 人类可读的状态文本
    pub status_text: String,
    /// 进度百分比（0-100）
    pub percent: i32,
    /// 目录报告的结果总数
    pub found_results: i32,
    /// 已提取的记录数
    pub processed_results: i32,
}

/// 进度回调
///
/// 由任务生命周期管理器注入，把报告转发给持久化接口。
pub type ProgressSink = Arc<dyn Fn(ProgressReport) -> BoxFuture<'static, ()> + Send + Sync>;

/// 提取循环错误类型
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 浏览器自动化层错误（含导航超时）
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// 页面已渲染但预期结构缺失
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// 操作员发起的取消
    #[error("Scrape cancelled by operator")]
    Cancelled,
}

/// 提取循环结果
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    /// 全部提取出的企业记录
    pub companies: Vec<Company>,
    /// 目录报告的结果总数（尽力而为，可能为0）
    pub found: i32,
    /// 实际访问的页面数
    pub pages: u32,
}

/// 抓取服务
///
/// 驱动 NavigateSearch → CheckEmpty → ExtractPage →
/// CheckNextPage → {ExtractPage | Done} 状态机。取消在
/// 每个挂起点之前被观察，命中后向上抛出Cancelled。
/// 单个任务内页面严格按源顺序串行提取。
pub struct ScrapeService {
    /// 礼貌策略
    politeness: PolitenessPolicy,
    /// 单个任务允许抓取的最大页数
    max_pages: u32,
}

impl ScrapeService {
    /// 创建新的抓取服务实例
    ///
    /// # 参数
    ///
    /// * `politeness` - 礼貌策略
    /// * `max_pages` - 页数上限，防止目录永不收尾时任务无限运行
    pub fn new(politeness: PolitenessPolicy, max_pages: u32) -> Self {
        Self {
            politeness,
            max_pages: max_pages.max(1),
        }
    }

    /// 执行分页提取循环
    ///
    /// # 参数
    ///
    /// * `page` - 任务独占的页面句柄
    /// * `search_url` - 查询构造器产出的搜索定位器
    /// * `cancel` - 协作式取消标志
    /// * `progress` - 进度回调
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeOutcome)` - 全部页面提取完成
    /// * `Err(ScrapeError)` - 导航超时、结构缺失或被取消
    pub async fn run(
        &self,
        page: &dyn DirectoryPage,
        search_url: &str,
        cancel: &AtomicBool,
        progress: &ProgressSink,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        // NavigateSearch
        ensure_not_cancelled(cancel)?;
        page.goto(search_url).await?;

        // CheckEmpty
        ensure_not_cancelled(cancel)?;
        if page.exists(NO_RESULTS_SELECTOR).await {
            tracing::info!("Directory reported no results for this filter");
            emit(
                progress,
                ProgressReport {
                    status_text: "No results".to_string(),
                    percent: 100,
                    found_results: 0,
                    processed_results: 0,
                },
            )
            .await;
            return Ok(ScrapeOutcome::default());
        }

        page.wait_for(RESULTS_CONTAINER_SELECTOR).await?;

        let mut companies: Vec<Company> = Vec::new();
        let mut found = 0i32;
        let mut pages_fetched = 0u32;

        loop {
            // ExtractPage
            ensure_not_cancelled(cancel)?;
            let html = page.html().await?;
            if pages_fetched == 0 {
                found = ExtractionService::total_count(&html);
            }

            let batch = ExtractionService::extract_companies(&html);
            if batch.is_empty() && pages_fetched == 0 {
                return Err(ScrapeError::Extraction(
                    "results container rendered but no result card matched the extraction schema"
                        .to_string(),
                ));
            }
            tracing::debug!(
                page = pages_fetched + 1,
                extracted = batch.len(),
                "Extracted result page"
            );
            companies.extend(batch);
            pages_fetched += 1;

            // CheckNextPage
            let has_next = page.exists(NEXT_PAGE_SELECTOR).await;
            if !has_next {
                break;
            }
            if pages_fetched >= self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    "Page bound reached with a next control still present, finishing early"
                );
                break;
            }

            emit(
                progress,
                ProgressReport {
                    status_text: format!("Extracted page {}", pages_fetched),
                    percent: interim_percent(found, companies.len() as i32, pages_fetched),
                    found_results: found,
                    processed_results: companies.len() as i32,
                },
            )
            .await;

            // Politeness delay sits strictly between two page fetches
            self.politeness.pause(pages_fetched).await;
            ensure_not_cancelled(cancel)?;
            page.click(NEXT_PAGE_SELECTOR).await?;
            page.wait_for(RESULTS_CONTAINER_SELECTOR).await?;
        }

        // Done
        let processed = companies.len() as i32;
        emit(
            progress,
            ProgressReport {
                status_text: "Extraction finished".to_string(),
                percent: 100,
                found_results: found,
                processed_results: processed,
            },
        )
        .await;

        Ok(ScrapeOutcome {
            companies,
            found,
            pages: pages_fetched,
        })
    }
}

/// 发出一次进度报告
async fn emit(progress: &ProgressSink, report: ProgressReport) {
    (progress.as_ref())(report).await;
}

/// 检查协作式取消标志
fn ensure_not_cancelled(cancel: &AtomicBool) -> Result<(), ScrapeError> {
    if cancel.load(Ordering::SeqCst) {
        Err(ScrapeError::Cancelled)
    } else {
        Ok(())
    }
}

/// 计算中间进度百分比
///
/// 总数已知时按已处理比例计算，未知时按页数推进；
/// 两种口径都封顶为90，100只属于Done。
fn interim_percent(found: i32, processed: i32, pages_fetched: u32) -> i32 {
    let raw = if found > 0 {
        ((processed as i64 * 100) / found as i64) as i32
    } else {
        (pages_fetched as i32) * 10
    };
    raw.clamp(0, 90)
}
