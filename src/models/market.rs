//! 行情数据模型
//!
//! 定义 Merolagani 最新行情表对应的数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单只股票的行情记录
///
/// 对应行情表中的一行，JSON 字段使用 camelCase
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    /// 股票代码
    pub symbol: String,
    /// 公司名称（缺失时回退为股票代码）
    pub company_name: String,
    /// 所属行业（未知时为空字符串）
    pub sector: String,
    /// 最新成交价 (Last Traded Price)
    pub ltp: f64,
    /// 涨跌幅（百分比）
    pub percent_change: f64,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 成交量
    pub volume: i64,
    /// 昨收价
    pub previous_close: f64,
    /// 涨跌额
    pub change: f64,
    /// 成交额 = ltp × volume
    pub turnover: f64,
}

impl StockRecord {
    /// 根据价格和成交量计算成交额，成交量非正时为 0
    pub fn compute_turnover(ltp: f64, volume: i64) -> f64 {
        if volume > 0 {
            ltp * volume as f64
        } else {
            0.0
        }
    }
}

/// 市场状态
///
/// 目前没有交易时段判断逻辑，固定为 Open
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketStatus {
    #[default]
    Open,
}

/// 行情快照，即 `/nepse` 的响应体
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// 当天日期（YYYY-MM-DD）
    pub date: NaiveDate,
    /// 市场状态
    pub market_status: MarketStatus,
    /// 按源表格顺序排列的行情记录
    pub data: Vec<StockRecord>,
}

impl MarketSnapshot {
    pub fn new(date: NaiveDate, data: Vec<StockRecord>) -> Self {
        Self {
            date,
            market_status: MarketStatus::Open,
            data,
        }
    }

    /// 空快照，用于上游失败或未找到表格
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }
}
