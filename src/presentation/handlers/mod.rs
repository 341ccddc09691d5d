// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求处理器模块
///
/// 实现对外API各端点的请求处理逻辑
pub mod scrape_handler;
