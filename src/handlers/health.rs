use actix_web::{web, HttpResponse, Result};

use crate::models::ApiResponse;
use crate::services::market_service::MarketService;

pub async fn health_check(service: web::Data<MarketService>) -> Result<HttpResponse> {
    let response = ApiResponse::success("Service is healthy", service.clock());
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let service = MarketService::from_config(&AppConfig::default()).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "Service is healthy");
        assert!(body["timestamp"].as_str().is_some());
    }
}
