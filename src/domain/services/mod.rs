// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 结果页解析与字段提取
pub mod extraction_service;

/// 任务生命周期管理
pub mod job_service;

/// 搜索定位器构造
pub mod query_builder;

/// 分页提取循环
pub mod scrape_service;
