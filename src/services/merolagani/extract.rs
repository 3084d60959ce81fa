//! 行情表格解析
//!
//! 把定位到的表格逐行映射为 `StockRecord`，单行失败只跳过该行

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::StockRecord;

use super::common::{
    element_text, parse_float, parse_int, stripped_text, HEADER_SYMBOL_TOKEN, MIN_ROW_CELLS,
};
use super::table::{locate_table, TableStrategy};

fn tr_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("tr").unwrap())
}

fn td_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("td").unwrap())
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a").unwrap())
}

/// 跳过某一行的原因
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RowRejection {
    #[error("单元格不足: {0}")]
    TooFewCells(usize),
    #[error("缺少股票代码")]
    MissingSymbol,
    #[error("表头行")]
    HeaderRow,
}

/// 表格解析结果
#[derive(Debug, Default)]
pub struct Extraction {
    /// 是否找到了行情表格
    pub table_found: bool,
    /// 成功解析的记录，保持源表格顺序
    pub records: Vec<StockRecord>,
    /// 被跳过的行数
    pub skipped: usize,
}

/// 从整页 HTML 中提取行情记录
///
/// 找不到表格时返回空结果，不视为错误
pub fn extract_records(html: &str, strategies: &[TableStrategy]) -> Extraction {
    let document = Html::parse_document(html);

    let Some(table) = locate_table(&document, strategies) else {
        log::warn!("未找到行情表格");
        return Extraction::default();
    };

    let rows: Vec<ElementRef> = table.select(tr_selector()).skip(1).collect();
    log::info!("📊 找到 {} 行待处理", rows.len());

    let mut extraction = Extraction {
        table_found: true,
        ..Default::default()
    };

    for (i, row) in rows.into_iter().enumerate() {
        match parse_row(row) {
            Ok(record) => extraction.records.push(record),
            Err(reason) => {
                log::debug!("跳过第 {} 行: {}", i + 1, reason);
                extraction.skipped += 1;
            }
        }
    }

    log::info!(
        "📊 成功解析 {} 只股票，跳过 {} 行",
        extraction.records.len(),
        extraction.skipped
    );
    extraction
}

/// 解析单行
///
/// 列顺序：代码, LTP, 涨跌幅%, 开盘, 最高, 最低, 成交量, 昨收[, 涨跌额]
pub fn parse_row(row: ElementRef<'_>) -> Result<StockRecord, RowRejection> {
    let cells: Vec<ElementRef> = row.select(td_selector()).collect();
    if cells.len() < MIN_ROW_CELLS {
        return Err(RowRejection::TooFewCells(cells.len()));
    }

    let anchor = cells[0].select(anchor_selector()).next();
    let symbol = match &anchor {
        Some(a) => stripped_text(a),
        None => stripped_text(&cells[0]),
    };

    if symbol.is_empty() {
        return Err(RowRejection::MissingSymbol);
    }
    if symbol == HEADER_SYMBOL_TOKEN {
        return Err(RowRejection::HeaderRow);
    }

    let company_name = anchor
        .and_then(|a| a.value().attr("title"))
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| symbol.clone());

    let float_at = |i: usize| cells.get(i).map(|c| parse_float(&element_text(c))).unwrap_or(0.0);
    let int_at = |i: usize| cells.get(i).map(|c| parse_int(&element_text(c))).unwrap_or(0);

    let ltp = float_at(1);
    let percent_change = float_at(2);
    let open = float_at(3);
    let high = float_at(4);
    let low = float_at(5);
    let volume = int_at(6);
    let previous_close = float_at(7);

    let change = if cells.len() > 8 {
        float_at(8)
    } else {
        ltp - previous_close
    };

    Ok(StockRecord {
        symbol,
        company_name,
        sector: String::new(),
        ltp,
        percent_change,
        open,
        high,
        low,
        volume,
        previous_close,
        change,
        turnover: StockRecord::compute_turnover(ltp, volume),
    })
}
