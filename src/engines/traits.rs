// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 页面在超时预算内没有响应
    #[error("Navigation timed out after {0:?}")]
    NavigationTimeout(Duration),

    /// 浏览器协议层错误
    #[error("Browser error: {0}")]
    Browser(String),
}

/// 目录浏览器特质
///
/// 为每个抓取任务打开一个独占的页面句柄。具体实现
/// 可以是共享进程的Chromium，也可以是测试用的假页面。
#[async_trait]
pub trait DirectoryBrowser: Send + Sync {
    /// 打开一个新的页面
    ///
    /// # 返回值
    ///
    /// * `Ok(Arc<dyn DirectoryPage>)` - 任务独占的页面句柄
    /// * `Err(EngineError)` - 浏览器启动或连接失败
    async fn open_page(&self) -> Result<Arc<dyn DirectoryPage>, EngineError>;
}

/// 目录页面特质
///
/// 提取循环的全部挂起点都经过这里：导航、等待选择器、
/// 点击和读取渲染后的HTML。取消和超时只在这些调用上
/// 被观察到。
#[async_trait]
pub trait DirectoryPage: Send + Sync {
    /// 导航到指定URL并等待加载完成
    async fn goto(&self, url: &str) -> Result<(), EngineError>;

    /// 等待选择器出现，超出导航超时预算时报错
    async fn wait_for(&self, selector: &str) -> Result<(), EngineError>;

    /// 判断选择器当前是否存在（不等待）
    async fn exists(&self, selector: &str) -> bool;

    /// 点击选择器命中的第一个元素
    async fn click(&self, selector: &str) -> Result<(), EngineError>;

    /// 读取当前渲染后的页面HTML
    async fn html(&self) -> Result<String, EngineError>;

    /// 关闭页面并释放浏览器资源，可重复调用
    async fn close(&self);
}
