// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

// NAF activity code: four digits followed by one uppercase letter, e.g. "6201Z"
static CATEGORY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}[A-Z]$").expect("invalid category code regex"));

// Department code: 2-3 digits, or 2A/2B for Corsica
static REGION_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2,3}|2A|2B)$").expect("invalid region code regex"));

/// 校验行业代码格式
///
/// # 参数
///
/// * `code` - 待校验的行业代码
///
/// # 返回值
///
/// 格式合法时返回true
pub fn is_valid_category_code(code: &str) -> bool {
    CATEGORY_CODE_RE.is_match(code)
}

/// 校验地区代码格式
///
/// # 参数
///
/// * `code` - 待校验的地区代码
///
/// # 返回值
///
/// 格式合法时返回true
pub fn is_valid_region_code(code: &str) -> bool {
    REGION_CODE_RE.is_match(code)
}

/// 行业代码的DTO校验函数
pub fn validate_category_code(code: &str) -> Result<(), ValidationError> {
    if is_valid_category_code(code) {
        Ok(())
    } else {
        Err(ValidationError::new("category_code"))
    }
}

/// 地区代码的DTO校验函数
pub fn validate_region_code(code: &str) -> Result<(), ValidationError> {
    if is_valid_region_code(code) {
        Ok(())
    } else {
        Err(ValidationError::new("region_code"))
    }
}
