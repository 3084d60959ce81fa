//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod market_service;  // NEPSE 行情服务
pub mod merolagani;      // Merolagani 数据源
