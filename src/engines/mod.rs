// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Chromium浏览器引擎实现
pub mod chromium_engine;

/// 礼貌策略（页面间延迟与超时预算）
pub mod politeness;

/// 浏览器自动化接口定义
pub mod traits;
