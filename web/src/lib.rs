#![deny(missing_docs)]

//! # Sensorhub Web Library
//!
//! Contains route handlers, database logic, and schema definitions.

use actix_web::{get, web, HttpResponse, Responder};
use sensorhub_core::reply::MESSAGE_TAG;
use sensorhub_core::Reply;

use crate::negotiation::{respond, Negotiation};

/// Re-export diesel so models can access `crate::diesel`.
pub use diesel;

/// Server settings.
pub mod config;

/// Connection pool and query execution.
pub mod db;

/// Route handlers.
pub mod handlers;

/// Data models for every table.
pub mod models;

/// Negotiation extractor and response rendering.
pub mod negotiation;

/// Password hashing.
pub mod password;

/// Database schema.
pub mod schema;

/// Shared application state.
pub mod state;

pub use state::AppState;

/// Body of the reply for unknown routes.
pub const ROUTE_NOT_FOUND: &str = "not found";

/// A simple health check handler.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Fallback for requests no route matches.
pub async fn not_found(negotiation: Negotiation) -> impl Responder {
    respond(&negotiation, Ok(Reply::new(404, ROUTE_NOT_FOUND, MESSAGE_TAG)))
}

/// Registers the health check and every resource.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);
    handlers::config(cfg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_not_found_fallback() {
        let app = test::init_service(
            App::new()
                .configure(configure)
                .default_service(web::to(not_found)),
        )
        .await;
        let req = test::TestRequest::get().uri("/nowhere").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        assert_eq!(body, r#"{"message":"not found"}"#.as_bytes());
    }
}
