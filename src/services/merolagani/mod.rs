//! Merolagani 数据源
//!
//! 抓取 https://merolagani.com/LatestMarket.aspx 并解析最新行情表格
//!
//! ## 主要功能
//! - 页面抓取：浏览器请求头 + 超时，不重试
//! - 表格定位：class → id → 行数，按顺序回退
//! - 行解析：单元格宽松转数值，坏行跳过
//! - 详情补全：可选，补全公司名称和行业

mod common;
mod detail;
mod extract;
mod fetcher;
mod table;

pub use detail::DetailEnricher;
pub use extract::extract_records;
pub use fetcher::{FetchError, PageFetcher};
pub use table::{default_strategies, TableStrategy};
