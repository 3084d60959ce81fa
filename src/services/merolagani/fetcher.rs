//! 页面抓取
//!
//! 带浏览器请求头和超时的一次性 GET 请求，不做重试

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use super::common::HTML_ACCEPT;

/// 抓取失败的原因
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("请求超时: {0}")]
    Timeout(String),
    #[error("连接失败: {0}")]
    Connect(String),
    #[error("上游返回错误状态: {0}")]
    Status(StatusCode),
    #[error("读取响应体失败: {0}")]
    Body(String),
    #[error("请求失败: {0}")]
    Request(String),
    #[error("创建 HTTP 客户端失败: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status)
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// 页面抓取器
///
/// 内部的 `Client` 只持有连接池，不缓存任何结果
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// 创建抓取器，所有请求都带上浏览器标识和 Accept 头
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| FetchError::Client(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// 请求页面并返回解码后的 HTML
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        log::info!("📡 请求页面 URL: {}", url);
        self.fetch_with(self.client.get(url)).await
    }

    /// 请求带查询参数的页面
    pub async fn fetch_query(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let url = url::Url::parse_with_params(url, query)
            .map_err(|e| FetchError::Request(e.to_string()))?;
        log::info!("📡 请求页面 URL: {}", url);
        self.fetch_with(self.client.get(url).timeout(timeout)).await
    }

    async fn fetch_with(&self, request: reqwest::RequestBuilder) -> Result<String, FetchError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(decode_body(&bytes, content_type.as_deref()))
    }
}

/// 按 Content-Type 中的 charset 解码，未声明或不认识时按 UTF-8 处理
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(|ct| {
            ct.split(';')
                .filter_map(|part| part.trim().split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
                .map(|(_, value)| value.trim().trim_matches('"').to_string())
        })
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);

    encoding.decode(bytes).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body_defaults_to_utf8() {
        let text = decode_body("नेप्से".as_bytes(), Some("text/html"));
        assert_eq!(text, "नेप्से");
        assert_eq!(decode_body(b"abc", None), "abc");
    }

    #[test]
    fn test_decode_body_uses_charset() {
        // 0xE9 在 windows-1252 中是 é
        let text = decode_body(&[0x63, 0x61, 0x66, 0xE9], Some("text/html; charset=\"ISO-8859-1\""));
        assert_eq!(text, "café");
    }

    #[test]
    fn test_decode_body_unknown_charset() {
        assert_eq!(decode_body(b"ok", Some("text/html; charset=klingon")), "ok");
    }

    #[tokio::test]
    async fn test_connection_refused_is_distinguishable() {
        let fetcher = PageFetcher::new(
            "Mozilla/5.0",
            Duration::from_secs(5),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = fetcher.fetch("http://127.0.0.1:1/LatestMarket.aspx").await.unwrap_err();
        println!("  抓取失败: {}", err);
        assert!(matches!(err, FetchError::Connect(_) | FetchError::Request(_)));
    }
}
