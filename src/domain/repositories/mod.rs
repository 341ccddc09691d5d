// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 企业记录仓库接口
pub mod company_repository;

/// 抓取任务仓库接口
pub mod job_repository;
