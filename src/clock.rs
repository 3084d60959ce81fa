//! 市场时钟
//!
//! 决定快照日期和响应时间戳使用的时区

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// 市场时钟：未配置时区时使用服务器本地时间
#[derive(Debug, Clone, Copy, Default)]
pub enum MarketClock {
    #[default]
    Local,
    Zone(Tz),
}

impl MarketClock {
    /// 从 IANA 时区名创建，例如 "Asia/Kathmandu"
    pub fn from_timezone(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Self::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Self::Zone)
                .map_err(|e| anyhow!("无效的时区 {}: {}", name, e)),
        }
    }

    /// 当天日期
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::Local => Local::now().date_naive(),
            Self::Zone(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }

    /// 当前时间（ISO 8601 格式，带时区偏移）
    pub fn now_rfc3339(&self) -> String {
        match self {
            Self::Local => Local::now().to_rfc3339(),
            Self::Zone(tz) => Utc::now().with_timezone(tz).to_rfc3339(),
        }
    }
}
