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

use crate::domain::models::job::{DomainError, ScrapeJob, SearchFilter};
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::domain::services::query_builder::QueryBuilder;
use crate::domain::services::scrape_service::{
    ProgressReport, ProgressSink, ScrapeOutcome, ScrapeService,
};
use crate::engines::traits::{DirectoryBrowser, DirectoryPage};
use dashmap::DashMap;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 任务服务错误类型
#[derive(Error, Debug)]
pub enum JobServiceError {
    /// 过滤条件校验失败，同步返回给start调用方
    #[error("Validation error: {0}")]
    Validation(String),

    /// 任务ID未知
    #[error("Job not found")]
    NotFound,

    /// 仓库层错误
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 活动会话
///
/// 把运行中的任务映射到它独占的页面句柄和取消标志。
/// 每个运行中的任务恰好一个会话，任务到达终止状态时
/// 从注册表移除。
pub struct ActiveSession {
    /// 协作式取消标志
    cancel: AtomicBool,
    /// 任务独占的页面句柄，后台任务打开后填入
    page: parking_lot::Mutex<Option<Arc<dyn DirectoryPage>>>,
}

impl ActiveSession {
    fn new() -> Self {
        Self {
            cancel: AtomicBool::new(false),
            page: parking_lot::Mutex::new(None),
        }
    }

    /// 置位取消标志
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// 读取取消标志
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// 取消标志的引用，提取循环在挂起点上观察它
    pub fn cancel_flag(&self) -> &AtomicBool {
        &self.cancel
    }

    fn store_page(&self, page: Arc<dyn DirectoryPage>) {
        *self.page.lock() = Some(page);
    }

    fn take_page(&self) -> Option<Arc<dyn DirectoryPage>> {
        self.page.lock().take()
    }
}

/// 任务生命周期管理器
///
/// 持有运行中任务的注册表（任务ID → 活动会话），对外
/// 提供start/status/stop。注册表是核心中唯一的共享可变
/// 状态，用并发安全的DashMap保护，由依赖注入传递而非
/// 全局环境状态。
pub struct JobService<J, C>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    jobs: Arc<J>,
    companies: Arc<C>,
    browser: Arc<dyn DirectoryBrowser>,
    scraper: Arc<ScrapeService>,
    query: QueryBuilder,
    sessions: Arc<DashMap<Uuid, Arc<ActiveSession>>>,
}

impl<J, C> JobService<J, C>
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    /// 创建新的任务服务实例
    ///
    /// # 参数
    ///
    /// * `jobs` - 任务仓库
    /// * `companies` - 企业记录仓库
    /// * `browser` - 目录浏览器
    /// * `scraper` - 抓取服务
    /// * `query` - 查询构造器
    pub fn new(
        jobs: Arc<J>,
        companies: Arc<C>,
        browser: Arc<dyn DirectoryBrowser>,
        scraper: Arc<ScrapeService>,
        query: QueryBuilder,
    ) -> Self {
        Self {
            jobs,
            companies,
            browser,
            scraper,
            query,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// 当前注册的活动会话数（测试与观测用）
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// 启动抓取任务
    ///
    /// 校验过滤条件，在返回前把状态为running的任务行持久
    /// 化并注册活动会话，然后调度独立后台任务执行提取
    /// 循环。本方法立即返回，不等待提取完成。
    ///
    /// # 参数
    ///
    /// * `filter` - 抓取过滤条件
    ///
    /// # 返回值
    ///
    /// * `Ok(Uuid)` - 新任务的ID
    /// * `Err(JobServiceError)` - 校验或持久化失败
    pub async fn start(&self, filter: SearchFilter) -> Result<Uuid, JobServiceError> {
        filter
            .validate()
            .map_err(|e| JobServiceError::Validation(e.to_string()))?;

        let job = ScrapeJob::new(&filter)
            .start()
            .map_err(|e| JobServiceError::Validation(e.to_string()))?;
        self.jobs.create(&job).await?;

        let session = Arc::new(ActiveSession::new());
        self.sessions.insert(job.id, session.clone());

        let search_url = self.query.search_url(&filter).to_string();
        let jobs = self.jobs.clone();
        let companies = self.companies.clone();
        let browser = self.browser.clone();
        let scraper = self.scraper.clone();
        let sessions = self.sessions.clone();
        let job_id = job.id;

        info!(job_id = %job_id, category = %filter.category_code, region = %filter.region_code, "Scrape job started");

        // Fire-and-forget: the caller already has the job id
        tokio::spawn(async move {
            run_job(job, search_url, jobs, companies, browser, scraper, sessions, session).await;
        });

        Ok(job_id)
    }

    /// 查询任务状态
    ///
    /// # 参数
    ///
    /// * `id` - 任务ID
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJob)` - 任务当前快照
    /// * `Err(JobServiceError::NotFound)` - 任务ID未知
    pub async fn status(&self, id: Uuid) -> Result<ScrapeJob, JobServiceError> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or(JobServiceError::NotFound)
    }

    /// 请求停止任务
    ///
    /// 协作式取消：置位会话的取消标志并释放浏览器资源，
    /// 在途的后台任务会在下一个挂起点观察到信号并把任务
    /// 终止为failed。任务已处于终止状态时为幂等空操作。
    ///
    /// # 参数
    ///
    /// * `id` - 任务ID
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 信号已发出或任务本就不在运行
    /// * `Err(JobServiceError::NotFound)` - 任务ID未知
    pub async fn stop(&self, id: Uuid) -> Result<(), JobServiceError> {
        // Unknown ids are an error, already-terminal ids are a no-op
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or(JobServiceError::NotFound)?;

        if let Some((_, session)) = self.sessions.remove(&id) {
            session.cancel();
            if let Some(page) = session.take_page() {
                page.close().await;
            }
            info!(job_id = %id, "Stop requested, cancellation signalled");
        }
        Ok(())
    }
}

/// 后台任务主体
///
/// 打开页面、执行提取循环、根据结果写入终止状态。页面
/// 关闭和会话移除在每条退出路径上执行（成功、提取错误
/// 或取消），不会泄漏会话。
#[allow(clippy::too_many_arguments)]
async fn run_job<J, C>(
    job: ScrapeJob,
    search_url: String,
    jobs: Arc<J>,
    companies: Arc<C>,
    browser: Arc<dyn DirectoryBrowser>,
    scraper: Arc<ScrapeService>,
    sessions: Arc<DashMap<Uuid, Arc<ActiveSession>>>,
    session: Arc<ActiveSession>,
) where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let job_id = job.id;

    let result = execute(&job_id, &search_url, &jobs, &browser, &scraper, &session).await;

    let finalized = match result {
        Ok(outcome) => match companies.upsert_all(&outcome.companies).await {
            Ok(written) => {
                info!(
                    job_id = %job_id,
                    pages = outcome.pages,
                    records = written,
                    "Scrape job completed"
                );
                job.complete(outcome.found, outcome.companies.len() as i32)
            }
            Err(e) => {
                error!(job_id = %job_id, "Failed to persist extracted records: {}", e);
                fail_with_reported_counts(
                    job,
                    &jobs,
                    format!("Failed to persist extracted records: {}", e),
                )
                .await
            }
        },
        Err(e) => {
            warn!(job_id = %job_id, "Scrape job failed: {}", e);
            fail_with_reported_counts(job, &jobs, e.to_string()).await
        }
    };

    match finalized {
        Ok(final_job) => {
            if let Err(e) = jobs.finalize(&final_job).await {
                error!(job_id = %job_id, "Failed to record terminal job state: {}", e);
            }
        }
        // The job owner is the only writer, so this only fires on a logic bug
        Err(e) => error!(job_id = %job_id, "Refusing terminal transition: {}", e),
    }

    // Cleanup runs on every exit path
    if let Some(page) = session.take_page() {
        page.close().await;
    }
    sessions.remove(&job_id);
}

/// 终止为失败，同时保留已上报的进度计数
///
/// 后台任务内存中的任务副本停留在创建时刻，直接用它落盘
/// 会把进度回调已写入的percent/found/processed清零。失败
/// 前先读回当前行，把计数带进终止写入；100只属于完成的
/// 任务，进度在此封顶为90。
async fn fail_with_reported_counts<J>(
    mut job: ScrapeJob,
    jobs: &Arc<J>,
    message: String,
) -> Result<ScrapeJob, DomainError>
where
    J: JobRepository + 'static,
{
    match jobs.find_by_id(job.id).await {
        Ok(Some(current)) => {
            job.progress = current.progress.min(90);
            job.found_count = current.found_count;
            job.processed_count = current.processed_count;
        }
        Ok(None) => {}
        Err(e) => {
            warn!(job_id = %job.id, "Could not read back reported counts: {}", e);
        }
    }
    job.fail(message)
}

/// 执行一次提取，错误留给调用方统一落盘
async fn execute<J>(
    job_id: &Uuid,
    search_url: &str,
    jobs: &Arc<J>,
    browser: &Arc<dyn DirectoryBrowser>,
    scraper: &Arc<ScrapeService>,
    session: &Arc<ActiveSession>,
) -> Result<ScrapeOutcome, crate::domain::services::scrape_service::ScrapeError>
where
    J: JobRepository + 'static,
{
    use crate::domain::services::scrape_service::ScrapeError;

    let page = browser.open_page().await?;
    session.store_page(page.clone());

    // stop() may have raced the page registration; the caller closes it
    if session.is_cancelled() {
        return Err(ScrapeError::Cancelled);
    }

    let progress: ProgressSink = {
        let jobs = jobs.clone();
        let job_id = *job_id;
        Arc::new(move |report: ProgressReport| -> BoxFuture<'static, ()> {
            let jobs = jobs.clone();
            Box::pin(async move {
                if let Err(e) = jobs
                    .update_progress(
                        job_id,
                        report.percent,
                        report.found_results,
                        report.processed_results,
                    )
                    .await
                {
                    warn!(job_id = %job_id, "Failed to record progress: {}", e);
                }
            })
        })
    };

    match scraper
        .run(page.as_ref(), search_url, session.cancel_flag(), &progress)
        .await
    {
        // stop() closes the page out from under the loop; report the
        // cancellation, not the page error it provokes.
        Err(_) if session.is_cancelled() => Err(ScrapeError::Cancelled),
        other => other,
    }
}
