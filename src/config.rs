//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，部分字段可由环境变量覆盖

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 最新行情页面地址
    #[serde(default = "default_source_url")]
    pub url: String,
    /// 公司详情页面地址（不含 symbol 参数）
    #[serde(default = "default_detail_url")]
    pub detail_url: String,
    /// 请求使用的浏览器标识
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 市场时区（IANA 名称），为空则使用服务器本地时间
    #[serde(default)]
    pub timezone: Option<String>,
}

/// 公司详情补全配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// 是否启用（每个代码会额外请求一次详情页）
    #[serde(default)]
    pub enabled: bool,
    /// 最多补全的股票数量
    #[serde(default = "default_enrich_max_symbols")]
    pub max_symbols: usize,
    /// 单次详情请求超时时间（秒）
    #[serde(default = "default_enrich_timeout")]
    pub timeout_secs: u64,
}

/// 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据源配置
    #[serde(default)]
    pub source: SourceConfig,
    /// 详情补全配置
    #[serde(default)]
    pub enrich: EnrichConfig,
    /// 跨域配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_source_url() -> String { "https://merolagani.com/LatestMarket.aspx".to_string() }
fn default_detail_url() -> String { "https://merolagani.com/CompanyDetail.aspx".to_string() }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_enrich_max_symbols() -> usize { 3 }
fn default_enrich_timeout() -> u64 { 10 }
fn default_true() -> bool { true }
fn default_allow_origin() -> String { "*".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            detail_url: default_detail_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            timezone: None,
        }
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_symbols: default_enrich_max_symbols(),
            timeout_secs: default_enrich_timeout(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_origin: default_allow_origin(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先 NEPSE_CONFIG 指定的文件，其次默认路径，失败则使用默认值
    ///
    /// 此时日志系统尚未初始化，提示信息直接输出到 stderr
    pub fn load() -> Self {
        let mut config = Self::load_file().unwrap_or_else(|| {
            eprintln!("使用默认配置");
            Self::default()
        });
        config.apply_env();
        config
    }

    fn load_file() -> Option<Self> {
        let mut config_paths = vec!["config.json".to_string(), "config/config.json".to_string()];
        if let Ok(path) = env::var("NEPSE_CONFIG") {
            config_paths.insert(0, path);
        }

        for path in config_paths {
            if Path::new(&path).exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        eprintln!("从 {} 加载配置成功", path);
                        return Some(config);
                    }
                    Err(e) => {
                        eprintln!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        None
    }

    /// 环境变量覆盖：PORT、NEPSE_SOURCE_URL
    fn apply_env(&mut self) {
        if let Ok(port) = env::var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("忽略无效的 PORT 环境变量: {}", port),
            }
        }
        if let Ok(url) = env::var("NEPSE_SOURCE_URL") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
