// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 日志与遥测初始化
pub mod telemetry;

/// 过滤条件格式校验
pub mod validators;
