//! NEPSE 行情后端服务
//!
//! 抓取 Merolagani 最新行情页面，以 JSON 形式提供 NEPSE 股票数据
//! 数据来源：https://merolagani.com/LatestMarket.aspx

mod clock;      // 市场时钟
mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::{Condition, Logger}, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::CorsMiddleware;
use crate::services::market_service::MarketService;

/// 应用程序入口
///
/// 加载配置后启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置中的级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    let service = MarketService::from_config(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let service = web::Data::new(service);

    if config.enrich.enabled {
        log::info!("已启用公司详情补全，最多 {} 只股票", config.enrich.max_symbols);
    }
    log::info!("启动 NEPSE 行情服务，数据源: {}", config.source.url);

    let cors = config.cors.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Condition::new(cors.enabled, CorsMiddleware::new(&cors.allow_origin)))
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
