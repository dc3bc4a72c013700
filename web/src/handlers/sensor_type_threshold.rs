use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::SENSOR_TYPE_THRESHOLD;
use sensorhub_core::{AppResult, Reply};

use super::now;
use crate::db::run;
use crate::models::{SensorTypeThreshold, SensorTypeThresholdForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::sensor_type_thresholds as thresholds;
use crate::state::AppState;

/// Registers `/sensorTypeThreshold` routes. Items are keyed by device and type.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sensorTypeThreshold")
            .route(web::post().to(create_threshold))
            .route(web::get().to(list_thresholds)),
    );
    cfg.service(
        web::resource("/sensorTypeThreshold/{deviceUuid}/{typeName}")
            .route(web::get().to(get_threshold))
            .route(web::patch().to(update_threshold))
            .route(web::delete().to(delete_threshold)),
    );
}

/// `POST /sensorTypeThreshold`
pub async fn create_threshold(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: SensorTypeThresholdForm = state
        .accept_as(&SENSOR_TYPE_THRESHOLD, negotiation, body)
        .await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(thresholds::table)
            .values((&form, thresholds::created_at.eq(stamp), thresholds::updated_at.eq(stamp)))
            .returning(SensorTypeThreshold::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(
        device_uuid = %row.sensor_device_uuid,
        type_name = %row.type_name,
        "threshold created"
    );
    Reply::serialize(201, &row, SENSOR_TYPE_THRESHOLD.tag)
}

/// `GET /sensorTypeThreshold`
pub async fn list_thresholds(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        thresholds::table
            .order((thresholds::sensor_device_uuid, thresholds::type_name))
            .select(SensorTypeThreshold::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, SENSOR_TYPE_THRESHOLD.tag));
    respond(&negotiation, outcome)
}

/// `GET /sensorTypeThreshold/{deviceUuid}/{typeName}`
pub async fn get_threshold(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let key = path.into_inner();
    let outcome = run(&state.pool, move |conn| {
        thresholds::table
            .find(key)
            .select(SensorTypeThreshold::as_select())
            .first(conn)
    })
    .await
    .and_then(|row| Reply::serialize(200, &row, SENSOR_TYPE_THRESHOLD.tag));
    respond(&negotiation, outcome)
}

/// `PATCH /sensorTypeThreshold/{deviceUuid}/{typeName}`
pub async fn update_threshold(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, update(&state, &negotiation, path.into_inner(), body).await)
}

async fn update(
    state: &AppState,
    negotiation: &Negotiation,
    key: (String, String),
    body: web::Bytes,
) -> AppResult<Reply> {
    let form: SensorTypeThresholdForm = state
        .accept_as(&SENSOR_TYPE_THRESHOLD, negotiation, body)
        .await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(thresholds::table.find(key))
            .set((&form, thresholds::updated_at.eq(stamp)))
            .returning(SensorTypeThreshold::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, SENSOR_TYPE_THRESHOLD.tag)
}

/// `DELETE /sensorTypeThreshold/{deviceUuid}/{typeName}`
pub async fn delete_threshold(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let key = path.into_inner();
    let outcome = run(&state.pool, move |conn| {
        diesel::delete(thresholds::table.find(key))
            .returning(SensorTypeThreshold::as_returning())
            .get_result(conn)
    })
    .await
    .and_then(|row| Reply::serialize(200, &row, SENSOR_TYPE_THRESHOLD.tag));
    respond(&negotiation, outcome)
}
