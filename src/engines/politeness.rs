// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use rand::Rng;
use std::time::Duration;

/// 礼貌策略
///
/// 控制单个任务对目标站点的访问节奏：页面间强制延迟、
/// 导航超时预算和描述性的客户端标识。一个任务同一时刻
/// 最多只有一个在途页面请求（提取循环本身是顺序的）。
#[derive(Debug, Clone)]
pub struct PolitenessPolicy {
    /// 相邻两次页面抓取之间的延迟
    delay: Duration,
    /// 单次导航/等待的超时预算
    timeout: Duration,
    /// 客户端标识字符串
    user_agent: String,
}

impl PolitenessPolicy {
    /// 从配置创建礼貌策略
    ///
    /// # 参数
    ///
    /// * `settings` - 抓取器配置
    ///
    /// # 返回值
    ///
    /// 返回新的礼貌策略实例
    pub fn new(settings: &ScraperSettings) -> Self {
        Self {
            delay: Duration::from_millis(settings.page_delay_ms),
            timeout: Duration::from_millis(settings.nav_timeout_ms),
            user_agent: settings.user_agent.clone(),
        }
    }

    /// 获取导航超时预算
    pub fn navigation_timeout(&self) -> Duration {
        self.timeout
    }

    /// 获取客户端标识
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 在相邻页面抓取之间暂停
    ///
    /// 延迟只作用于页面之间，首个页面之前不暂停。
    /// 实际延迟带±20%抖动，避免固定节奏触发反自动化防御。
    ///
    /// # 参数
    ///
    /// * `pages_fetched` - 已经抓取完成的页面数
    pub async fn pause(&self, pages_fetched: u32) {
        if pages_fetched == 0 || self.delay.is_zero() {
            return;
        }
        let jitter: f64 = rand::rng().random_range(0.8..1.2);
        let wait = self.delay.mul_f64(jitter);
        tokio::time::sleep(wait).await;
    }
}
