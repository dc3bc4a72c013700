//! Request paths that end before any database access, so no server is needed.

use actix_web::http::header::{ACCEPT, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use sensorhub_core::Pipeline;
use sensorhub_web::db::build_pool;
use sensorhub_web::{configure, not_found, AppState};
use serde_json::{json, Value};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(
                    build_pool("postgres://nobody@127.0.0.1:9/nothing", 1),
                    Pipeline::builtin().unwrap(),
                )))
                .configure(configure)
                .default_service(web::to(not_found)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_text_plain_is_rejected_with_json_error() {
    let app = app!();
    for uri in ["/company", "/location", "/sensor", "/measurement", "/user"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header((CONTENT_TYPE, "text/plain"))
            .insert_header((ACCEPT, "application/xml"))
            .set_payload("name=Acme")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"error": "Invalid content type. Expected application/json or application/xml"})
        );
    }
}

#[actix_web::test]
async fn test_missing_fields_are_listed() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/location")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"name":"HQ"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let errors = body.as_array().unwrap();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e["constraint"] == "required"));
}

#[actix_web::test]
async fn test_unacceptable_accept_wins_over_error_status() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/room")
        .insert_header((CONTENT_TYPE, "application/json"))
        .insert_header((ACCEPT, "text/plain"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(test::read_body(resp).await, "Not Acceptable".as_bytes());
}

#[actix_web::test]
async fn test_xml_schema_violation() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/sensor")
        .insert_header((CONTENT_TYPE, "application/xml"))
        .insert_header((ACCEPT, "application/xml"))
        .set_payload("<sensor><deviceUuid>eui-01</deviceUuid><colour>red</colour></sensor>")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/xml");
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.starts_with("<error>Element "), "{body}");
    assert!(body.contains("colour"), "{body}");
    assert!(body.ends_with("</error>"), "{body}");
}

#[actix_web::test]
async fn test_malformed_json() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/role")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"name": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_out_of_range_timestamp() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/measurement")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload(
            r#"{"value":1.5,"timestamp":9223372036854775807,"deviceUuid":"eui-01","typeName":"co2"}"#,
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"message": "timestamp 9223372036854775807 is out of range"})
    );
}

#[actix_web::test]
async fn test_invalid_ids_are_bad_requests() {
    let app = app!();
    let requests = [
        test::TestRequest::get().uri("/location/abc"),
        test::TestRequest::delete().uri("/room/0"),
        test::TestRequest::get().uri("/userRole/user/-1"),
        test::TestRequest::post().uri("/userRole/1/x"),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "Invalid request"}));
    }
}

#[actix_web::test]
async fn test_unknown_route() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/building/7")
        .insert_header((ACCEPT, "application/xml"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(test::read_body(resp).await, "<message>not found</message>".as_bytes());
}

#[actix_web::test]
async fn test_health() {
    let app = app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK".as_bytes());
}
