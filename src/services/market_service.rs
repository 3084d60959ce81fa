//! NEPSE 行情服务
//!
//! 每次请求独立完成 抓取 → 解析 → 快照，请求之间不共享结果

use anyhow::Result;
use std::time::Duration;

use crate::clock::MarketClock;
use crate::config::AppConfig;
use crate::models::MarketSnapshot;
use crate::services::merolagani::{
    default_strategies, extract_records, DetailEnricher, FetchError, PageFetcher, TableStrategy,
};

/// 行情服务
pub struct MarketService {
    fetcher: PageFetcher,
    source_url: String,
    strategies: Vec<TableStrategy>,
    enricher: Option<DetailEnricher>,
    clock: MarketClock,
}

impl MarketService {
    /// 根据配置创建服务
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(
            &config.source.user_agent,
            Duration::from_secs(config.source.timeout_secs),
            Duration::from_secs(config.source.connect_timeout_secs),
        )?;

        let enricher = config.enrich.enabled.then(|| {
            DetailEnricher::new(
                fetcher.clone(),
                config.source.detail_url.clone(),
                config.enrich.max_symbols,
                Duration::from_secs(config.enrich.timeout_secs),
            )
        });

        Ok(Self {
            fetcher,
            source_url: config.source.url.clone(),
            strategies: default_strategies(),
            enricher,
            clock: MarketClock::from_timezone(config.source.timezone.as_deref())?,
        })
    }

    pub fn clock(&self) -> &MarketClock {
        &self.clock
    }

    /// 获取行情快照
    ///
    /// 上游失败或找不到表格时返回空快照，不返回错误
    pub async fn snapshot(&self) -> MarketSnapshot {
        let date = self.clock.today();
        match self.try_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("获取 NEPSE 行情失败，返回空数据: {}", e);
                MarketSnapshot::empty(date)
            }
        }
    }

    /// 获取行情快照，抓取失败时返回具体原因
    pub async fn try_snapshot(&self) -> Result<MarketSnapshot, FetchError> {
        let html = self.fetcher.fetch(&self.source_url).await?;
        let date = self.clock.today();

        let mut extraction = extract_records(&html, &self.strategies);
        log::debug!(
            "表格{}，跳过 {} 行",
            if extraction.table_found { "已定位" } else { "未找到" },
            extraction.skipped
        );
        if let Some(enricher) = &self.enricher {
            enricher.enrich(&mut extraction.records).await;
        }

        Ok(MarketSnapshot::new(date, extraction.records))
    }
}
