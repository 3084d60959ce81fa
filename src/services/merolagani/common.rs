//! 公共常量和辅助函数

// ==================== 页面结构常量 ====================

/// 主行情表格的 class 组合
pub const MARKET_TABLE_CLASSES: &str = "table.table.table-striped.table-bordered.table-hover";
/// 行情表格的历史元素 id
pub const MARKET_TABLE_ID: &str = "ctl00_ContentPlaceHolder1_LatestMarket1_gvLatestMarket";
/// 兜底策略：行数超过该值的表格视为数据表
pub const MIN_DATA_TABLE_ROWS: usize = 10;
/// 一行有效数据至少需要的单元格数
pub const MIN_ROW_CELLS: usize = 8;
/// 表头中的代码列标题
pub const HEADER_SYMBOL_TOKEN: &str = "Symbol";

/// 页面请求的 Accept 头
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// 数值中需要去掉的字符：千分位、百分号、货币符号
const FLOAT_NOISE: &[char] = &[',', '%', '$', '₨', '€', '£', '¥', '₹'];

/// 安全地把文本转换为浮点数
///
/// 去掉千分位、百分号和货币符号后解析，空串、无法解析或非有限值均返回 0.0
pub fn parse_float(value: &str) -> f64 {
    let cleaned: String = value.chars().filter(|c| !FLOAT_NOISE.contains(c)).collect();
    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_prefix("Rs.").unwrap_or(cleaned).trim();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// 安全地把文本转换为整数，空串或无法解析时返回 0
pub fn parse_int(value: &str) -> i64 {
    value.replace(',', "").trim().parse::<i64>().unwrap_or(0)
}

/// 拼接元素内每段文本并去掉首尾空白
pub fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 每段文本各自去空白后拼接，对应表格单元格内被标签拆开的文字
pub fn stripped_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().map(str::trim).collect::<String>()
}
