// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表现层模块
///
/// 提供HTTP API的错误映射、请求处理器和路由
pub mod errors;
pub mod handlers;
pub mod routes;
