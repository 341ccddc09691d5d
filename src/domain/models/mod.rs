// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 企业记录模型
pub mod company;

/// 抓取任务模型
pub mod job;
