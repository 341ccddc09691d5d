// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 企业记录实体
///
/// 表示从目录结果卡片中提取出的一条结构化企业记录。
/// 只有同时具备非空名称和9位SIREN标识符的候选记录
/// 才会被接受，其余字段均为尽力而为。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// 企业展示名称
    pub name: String,
    /// SIREN标识符，恰好9位数字
    pub siren: String,
    /// 开业日期（可选）
    pub activity_started_on: Option<NaiveDate>,
    /// 负责人名单，去重且保持插入顺序
    pub representatives: Vec<String>,
    /// 法律形式代码
    pub legal_form: Option<String>,
    /// 机构数量，缺省为1
    pub establishment_count: i32,
    /// 邮政编码
    pub postal_code: Option<String>,
    /// 城市
    pub city: Option<String>,
    /// 街道地址
    pub street: Option<String>,
    /// 企业状态，缺省为"active"
    pub status: String,
}

impl Company {
    /// 判断记录是否满足接受不变量
    ///
    /// # 返回值
    ///
    /// 名称非空且SIREN恰好为9位数字时返回true
    pub fn is_acceptable(&self) -> bool {
        !self.name.is_empty()
            && self.siren.len() == 9
            && self.siren.chars().all(|c| c.is_ascii_digit())
    }
}

impl Default for Company {
    fn default() -> Self {
        Self {
            name: String::new(),
            siren: String::new(),
            activity_started_on: None,
            representatives: Vec::new(),
            legal_form: None,
            establishment_count: 1,
            postal_code: None,
            city: None,
            street: None,
            status: "active".to_string(),
        }
    }
}
