// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::company::Company;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// 结果容器选择器，页面导航后等待它出现
pub const RESULTS_CONTAINER_SELECTOR: &str = "#search-results, ul.results-list, div.results";

/// "无结果"标记选择器
pub const NO_RESULTS_SELECTOR: &str = "#no-results, .no-result, .results-empty";

/// "下一页"控件选择器，禁用态不匹配
pub const NEXT_PAGE_SELECTOR: &str =
    "a.next-page:not(.disabled), li.pagination-next:not(.disabled) a, a[rel=\"next\"]";

/// 字段提取规则
///
/// 每个字段配一组规则，按顺序尝试，第一个命中者胜出。
/// 目标站点的具体标记不属于核心契约，全部隔离在这份
/// 规则表（schema v1）里。
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    /// CSS选择器
    selector: &'static str,
    /// 读取的属性；为None时读取元素文本
    attr: Option<&'static str>,
}

// --- Extraction schema v1 ---

const CARD_SELECTORS: &[&str] = &["article.result-card", "div.company-card", "li[data-siren]"];

const NAME_RULES: &[FieldRule] = &[
    FieldRule { selector: ".company-name", attr: None },
    FieldRule { selector: "h2 a", attr: None },
    FieldRule { selector: "h2", attr: None },
    FieldRule { selector: ".denomination", attr: None },
];

const SIREN_RULES: &[FieldRule] = &[
    FieldRule { selector: ".siren", attr: None },
    FieldRule { selector: "", attr: Some("data-siren") },
    FieldRule { selector: ".identifier", attr: None },
];

const DATE_RULES: &[FieldRule] = &[
    FieldRule { selector: ".activity-start", attr: None },
    FieldRule { selector: ".creation-date", attr: None },
    FieldRule { selector: "time", attr: Some("datetime") },
    FieldRule { selector: "time", attr: None },
];

const REPRESENTATIVE_RULES: &[FieldRule] = &[
    FieldRule { selector: ".representative", attr: None },
    FieldRule { selector: "ul.officers li", attr: None },
    FieldRule { selector: ".dirigeant", attr: None },
];

const LEGAL_FORM_RULES: &[FieldRule] = &[
    FieldRule { selector: ".legal-form", attr: None },
    FieldRule { selector: ".forme-juridique", attr: None },
];

const ADDRESS_RULES: &[FieldRule] = &[
    FieldRule { selector: ".address", attr: None },
    FieldRule { selector: ".adresse", attr: None },
    FieldRule { selector: "address", attr: None },
];

const ESTABLISHMENT_RULES: &[FieldRule] = &[
    FieldRule { selector: ".establishment-count", attr: None },
    FieldRule { selector: ".nb-etablissements", attr: None },
];

const STATUS_RULES: &[FieldRule] = &[
    FieldRule { selector: ".company-status", attr: None },
    FieldRule { selector: ".etat", attr: None },
];

const TOTAL_COUNT_RULES: &[FieldRule] = &[
    FieldRule { selector: ".results-count", attr: None },
    FieldRule { selector: "#total-results", attr: None },
    FieldRule { selector: ".results-header strong", attr: None },
];

static SIREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{9}").expect("invalid siren regex"));
static SLASH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("invalid date regex"));
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("invalid date regex"));
static POSTAL_CITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{5})\s+(.+)").expect("invalid postal regex"));
static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("invalid int regex"));

/// 提取服务
///
/// 对渲染后的结果页应用schema v1规则表，产出零条或多条
/// 候选企业记录。只有名称和SIREN同时命中的候选才会被
/// 接受，其余字段缺失时使用缺省值。
pub struct ExtractionService;

impl ExtractionService {
    /// 从结果页提取企业记录
    ///
    /// # 参数
    ///
    /// * `html_content` - 渲染后的页面HTML
    ///
    /// # 返回值
    ///
    /// 通过接受不变量的企业记录列表
    pub fn extract_companies(html_content: &str) -> Vec<Company> {
        let document = Html::parse_document(html_content);
        let mut companies = Vec::new();

        for card in select_cards(&document) {
            if let Some(company) = parse_card(&card) {
                companies.push(company);
            }
        }

        companies
    }

    /// 读取目录报告的结果总数
    ///
    /// 尽力而为：标记缺失或无法解析时返回0。
    ///
    /// # 参数
    ///
    /// * `html_content` - 渲染后的页面HTML
    ///
    /// # 返回值
    ///
    /// 结果总数，未知时为0
    pub fn total_count(html_content: &str) -> i32 {
        let document = Html::parse_document(html_content);
        let root = document.root_element();
        first_text(&root, TOTAL_COUNT_RULES)
            .and_then(|text| first_int(&text))
            .unwrap_or(0)
    }
}

/// 选出结果卡片元素
///
/// 卡片边界选择器同样按顺序回退，第一个命中任意元素的
/// 选择器胜出。
fn select_cards<'a>(document: &'a Html) -> Vec<ElementRef<'a>> {
    for selector_str in CARD_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let cards: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !cards.is_empty() {
            return cards;
        }
    }
    Vec::new()
}

/// 解析单张结果卡片
///
/// # 返回值
///
/// * `Some(Company)` - 名称和SIREN均命中
/// * `None` - 候选被拒绝
fn parse_card(card: &ElementRef) -> Option<Company> {
    let name = first_text(card, NAME_RULES)?;
    let siren = first_siren(card)?;

    let activity_started_on = first_text(card, DATE_RULES).and_then(|text| parse_date(&text));
    let representatives = all_texts_deduped(card, REPRESENTATIVE_RULES);
    let legal_form = first_text(card, LEGAL_FORM_RULES);
    let establishment_count = first_text(card, ESTABLISHMENT_RULES)
        .and_then(|text| first_int(&text))
        .unwrap_or(1);
    let (street, postal_code, city) = match first_text(card, ADDRESS_RULES) {
        Some(address) => split_address(&address),
        None => (None, None, None),
    };
    let status =
        first_text(card, STATUS_RULES).unwrap_or_else(|| "active".to_string());

    let company = Company {
        name,
        siren,
        activity_started_on,
        representatives,
        legal_form,
        establishment_count,
        postal_code,
        city,
        street,
        status,
    };

    company.is_acceptable().then_some(company)
}

/// 依次应用规则，返回第一个非空文本
fn first_text(scope: &ElementRef, rules: &[FieldRule]) -> Option<String> {
    for rule in rules {
        if let Some(value) = apply_rule(scope, rule) {
            return Some(value);
        }
    }
    None
}

/// 应用单条规则
///
/// 空选择器表示直接读取作用域元素自身的属性。
fn apply_rule(scope: &ElementRef, rule: &FieldRule) -> Option<String> {
    if rule.selector.is_empty() {
        let attr = rule.attr?;
        return scope
            .value()
            .attr(attr)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }

    let selector = Selector::parse(rule.selector).ok()?;
    for element in scope.select(&selector) {
        let value = match rule.attr {
            Some(attr) => element.value().attr(attr).map(|v| v.to_string()),
            None => Some(element.text().collect::<Vec<_>>().join(" ")),
        };
        if let Some(v) = value {
            let trimmed = v.trim().to_string();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }
    None
}

/// 收集规则命中的所有文本，去重并保持插入顺序
///
/// 与单值字段一致，第一个命中任意元素的选择器胜出。
fn all_texts_deduped(scope: &ElementRef, rules: &[FieldRule]) -> Vec<String> {
    for rule in rules {
        let Ok(selector) = Selector::parse(rule.selector) else {
            continue;
        };
        let mut values: Vec<String> = Vec::new();
        for element in scope.select(&selector) {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let trimmed = text.trim().to_string();
            if !trimmed.is_empty() && !values.contains(&trimmed) {
                values.push(trimmed);
            }
        }
        if !values.is_empty() {
            return values;
        }
    }
    Vec::new()
}

/// 从候选位置中找出第一个9位连续数字串
///
/// 展示格式常带空格分组（"123 456 789"），匹配前先去掉
/// 空白和点号。8位串不匹配，记录会被拒绝。
fn first_siren(card: &ElementRef) -> Option<String> {
    for rule in SIREN_RULES {
        if let Some(raw) = apply_rule(card, rule) {
            let normalized: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '.').collect();
            if let Some(m) = SIREN_RE.find(&normalized) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}

/// 解析开业日期
///
/// 接受 DD/MM/YYYY 和 YYYY-MM-DD 两种书写，二者规范化为
/// 同一个内部日期值。
fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Some(m) = SLASH_DATE_RE.find(text) {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), "%d/%m/%Y") {
            return Some(date);
        }
    }
    if let Some(m) = ISO_DATE_RE.find(text) {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

/// 按5位数字串切分地址为（街道, 邮编, 城市）
fn split_address(address: &str) -> (Option<String>, Option<String>, Option<String>) {
    match POSTAL_CITY_RE.captures(address) {
        Some(caps) => {
            let postal = caps.get(1).map(|m| m.as_str().to_string());
            let city = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|c| !c.is_empty());
            let street = address[..caps.get(1).map(|m| m.start()).unwrap_or(0)]
                .trim()
                .trim_end_matches(',')
                .trim()
                .to_string();
            let street = (!street.is_empty()).then_some(street);
            (street, postal, city)
        }
        None => {
            let street = address.trim().to_string();
            ((!street.is_empty()).then_some(street), None, None)
        }
    }
}

/// 解析文本中的第一个整数token
fn first_int(text: &str) -> Option<i32> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{202f}' && *c != '\u{a0}')
        .collect();
    INT_RE
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}
