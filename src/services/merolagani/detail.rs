//! 公司详情补全
//!
//! 对前若干只股票额外请求 CompanyDetail 页面，补全公司名称和行业。
//! 默认关闭，每个代码都会多一次网络请求。

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;

use crate::models::StockRecord;

use super::common::{element_text, stripped_text};
use super::fetcher::PageFetcher;

/// 从详情页解析出的公司信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDetail {
    /// 公司全称，未解析到时为空
    pub company_name: String,
    /// 行业，未解析到时为空
    pub sector: String,
}

fn sector_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Sector|Industry").unwrap())
}

fn sector_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Sector:").unwrap())
}

fn is_label(text: &str) -> bool {
    text == "Sector" || text == "Industry"
}

/// 解析公司详情页
pub fn parse_company_detail(html: &str, symbol: &str) -> CompanyDetail {
    let document = Html::parse_document(html);
    CompanyDetail {
        company_name: parse_company_name(&document, symbol).unwrap_or_default(),
        sector: parse_sector(&document).unwrap_or_default(),
    }
}

/// 标题格式: "ACLBSL | Aarambha Chautari Laghubitta Bittiya Sanstha Limited | Merolagani"
fn parse_company_name(document: &Html, symbol: &str) -> Option<String> {
    let title_selector = Selector::parse("title").unwrap();
    let from_title = document
        .select(&title_selector)
        .next()
        .map(|t| element_text(&t))
        .and_then(|title| title.split('|').nth(1).map(|s| s.trim().to_string()))
        .filter(|name| !name.is_empty());

    if from_title.is_some() {
        return from_title;
    }

    let heading_selector = Selector::parse("h1, h2, h3").unwrap();
    let upper_symbol = symbol.to_uppercase();
    document
        .select(&heading_selector)
        .map(|h| h.text().collect::<String>())
        .find(|text| text.to_uppercase().contains(&upper_symbol))
        .map(|text| {
            text.replace(symbol, "")
                .trim_matches(|c| c == ' ' || c == '|')
                .to_string()
        })
        .filter(|name| !name.is_empty())
}

fn parse_sector(document: &Html) -> Option<String> {
    let label_selector = Selector::parse("td, th").unwrap();

    let from_table = document
        .select(&label_selector)
        // 只看单一文本节点的单元格，外层布局单元格会包含整张嵌套表格的文字
        .filter(|cell| {
            let mut texts = cell.text();
            match (texts.next(), texts.next()) {
                (Some(text), None) => sector_label_regex().is_match(text),
                _ => false,
            }
        })
        .filter_map(|cell| cell.next_siblings().find_map(ElementRef::wrap))
        .map(|value| stripped_text(&value))
        .find(|text| !text.is_empty() && !is_label(text));

    if from_table.is_some() {
        return from_table;
    }

    document
        .root_element()
        .descendants()
        .filter(|node| {
            node.value()
                .as_text()
                .is_some_and(|text| sector_prefix_regex().is_match(text))
        })
        .filter_map(|node| node.parent().and_then(ElementRef::wrap))
        .map(|parent| {
            let text = parent.text().collect::<String>();
            text.replace("Sector:", "").trim().to_string()
        })
        .find(|text| !text.is_empty() && !is_label(text))
}

/// 补全器
pub struct DetailEnricher {
    fetcher: PageFetcher,
    detail_url: String,
    max_symbols: usize,
    timeout: Duration,
}

impl DetailEnricher {
    pub fn new(fetcher: PageFetcher, detail_url: String, max_symbols: usize, timeout: Duration) -> Self {
        Self {
            fetcher,
            detail_url,
            max_symbols,
            timeout,
        }
    }

    /// 获取单只股票的详情，失败时返回 None
    pub async fn fetch_detail(&self, symbol: &str) -> Option<CompanyDetail> {
        match self
            .fetcher
            .fetch_query(&self.detail_url, &[("symbol", symbol)], self.timeout)
            .await
        {
            Ok(html) => Some(parse_company_detail(&html, symbol)),
            Err(e) => {
                log::warn!("获取 {} 详情失败: {}", symbol, e);
                None
            }
        }
    }

    /// 依次补全前 max_symbols 条记录
    ///
    /// 行业总是覆盖；公司名只替换回退为代码的情况
    pub async fn enrich(&self, records: &mut [StockRecord]) {
        let total = records.len().min(self.max_symbols);
        for (i, record) in records.iter_mut().take(self.max_symbols).enumerate() {
            log::info!("📡 获取 {} 详情 ({}/{})", record.symbol, i + 1, total);
            if let Some(detail) = self.fetch_detail(&record.symbol).await {
                apply_detail(record, detail);
            }
        }
    }
}

fn apply_detail(record: &mut StockRecord, detail: CompanyDetail) {
    record.sector = detail.sector;
    if record.company_name == record.symbol && !detail.company_name.is_empty() {
        record.company_name = detail.company_name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_title_and_sector_from_table() {
        let html = r#"<html><head><title>ACLBSL | Aarambha Chautari Laghubitta Bittiya Sanstha Limited | Merolagani</title></head>
            <body><table>
              <tr><th>Sector</th><td> Microfinance </td></tr>
            </table></body></html>"#;

        let detail = parse_company_detail(html, "ACLBSL");
        assert_eq!(detail.company_name, "Aarambha Chautari Laghubitta Bittiya Sanstha Limited");
        assert_eq!(detail.sector, "Microfinance");
    }

    #[test]
    fn test_name_from_heading_fallback() {
        let html = r#"<html><head><title>Merolagani</title></head>
            <body><h1>NABIL | Nabil Bank Limited</h1></body></html>"#;

        let detail = parse_company_detail(html, "NABIL");
        assert_eq!(detail.company_name, "Nabil Bank Limited");
        assert_eq!(detail.sector, "");
    }

    #[test]
    fn test_sector_skips_label_values() {
        let html = r#"<html><body><table>
              <tr><td>Sector</td><td>Industry</td></tr>
              <tr><td>Industry</td><td>Hydro Power</td></tr>
            </table></body></html>"#;

        assert_eq!(parse_company_detail(html, "X").sector, "Hydro Power");
    }

    #[test]
    fn test_sector_ignores_layout_wrapper_cell() {
        let html = r#"<html><body><table><tr><td><table><tr><th>Sector</th><td>Hotels And Tourism</td></tr></table></td><td>Layout Junk</td></tr></table></body></html>"#;

        assert_eq!(parse_company_detail(html, "X").sector, "Hotels And Tourism");
    }

    #[test]
    fn test_sector_from_inline_label() {
        let html = r#"<html><body><div><span>Sector: Commercial Banks</span></div></body></html>"#;
        assert_eq!(parse_company_detail(html, "X").sector, "Commercial Banks");
    }

    #[test]
    fn test_apply_detail_keeps_anchor_title() {
        let mut record = StockRecord {
            symbol: "NABIL".to_string(),
            company_name: "Nabil Bank Ltd.".to_string(),
            sector: String::new(),
            ltp: 0.0,
            percent_change: 0.0,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            volume: 0,
            previous_close: 0.0,
            change: 0.0,
            turnover: 0.0,
        };

        apply_detail(
            &mut record,
            CompanyDetail {
                company_name: "Nabil Bank Limited".to_string(),
                sector: "Commercial Banks".to_string(),
            },
        );
        assert_eq!(record.company_name, "Nabil Bank Ltd.");
        assert_eq!(record.sector, "Commercial Banks");

        record.company_name = "NABIL".to_string();
        apply_detail(
            &mut record,
            CompanyDetail {
                company_name: "Nabil Bank Limited".to_string(),
                sector: "Commercial Banks".to_string(),
            },
        );
        assert_eq!(record.company_name, "Nabil Bank Limited");
    }
}
