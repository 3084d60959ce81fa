//! 行情表格定位
//!
//! 页面没有稳定的选择器，按顺序尝试多种策略，第一个命中的生效

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use super::common::{MARKET_TABLE_CLASSES, MARKET_TABLE_ID, MIN_DATA_TABLE_ROWS};

fn table_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("table").unwrap())
}

fn row_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("tr").unwrap())
}

/// 表格定位策略
#[derive(Debug, Clone)]
pub enum TableStrategy {
    /// 按 class 组合匹配
    Classes(Selector),
    /// 按元素 id 匹配
    Id(Selector),
    /// 第一个行数超过阈值的表格
    MinRows(usize),
}

impl TableStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classes(_) => "class",
            Self::Id(_) => "id",
            Self::MinRows(_) => "row-count",
        }
    }

    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        match self {
            Self::Classes(selector) | Self::Id(selector) => document.select(selector).next(),
            Self::MinRows(threshold) => document
                .select(table_selector())
                .find(|table| table.select(row_selector()).count() > *threshold),
        }
    }
}

/// Merolagani 行情页的默认策略顺序：class → id → 行数
pub fn default_strategies() -> Vec<TableStrategy> {
    vec![
        TableStrategy::Classes(Selector::parse(MARKET_TABLE_CLASSES).unwrap()),
        TableStrategy::Id(Selector::parse(&format!("table#{}", MARKET_TABLE_ID)).unwrap()),
        TableStrategy::MinRows(MIN_DATA_TABLE_ROWS),
    ]
}

/// 依次尝试各策略，返回第一个找到的表格
pub fn locate_table<'a>(
    document: &'a Html,
    strategies: &[TableStrategy],
) -> Option<ElementRef<'a>> {
    strategies.iter().find_map(|strategy| {
        let table = strategy.locate(document)?;
        log::debug!("通过 {} 策略定位到行情表格", strategy.name());
        Some(table)
    })
}
