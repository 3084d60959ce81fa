//! 行情接口处理器
//!
//! - GET /nepse - 获取 NEPSE 最新行情快照

use actix_web::{web, HttpResponse, Result};

use crate::services::market_service::MarketService;

/// 上游失败时同样返回 200 和空的 data
pub async fn get_nepse_data(service: web::Data<MarketService>) -> Result<HttpResponse> {
    let snapshot = service.snapshot().await;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/nepse", web::get().to(get_nepse_data));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::market_service::tests::{config_for, spawn_upstream};
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_nepse_returns_records() {
        let (base, handle) = spawn_upstream();
        let service = MarketService::from_config(&config_for(&base, "LatestMarket.aspx")).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/nepse").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["marketStatus"], "Open");
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["symbol"], "NABIL");
        assert_eq!(data[0]["companyName"], "Nabil Bank Ltd.");
        assert_eq!(data[0]["volume"], 12000);
        assert_eq!(data[0]["turnover"], 15_000_000.0);

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_nepse_upstream_failure_is_200() {
        let service =
            MarketService::from_config(&config_for("http://127.0.0.1:1", "LatestMarket.aspx"))
                .unwrap();
        let today = service.clock().today().format("%Y-%m-%d").to_string();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/nepse").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["marketStatus"], "Open");
        assert_eq!(body["date"], today);
    }
}
