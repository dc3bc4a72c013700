use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::SENSOR;
use sensorhub_core::{AppResult, Reply};

use super::now;
use crate::db::run;
use crate::models::{NewSensor, Sensor, SensorForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::sensors;
use crate::state::AppState;

/// Registers `/sensor` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sensor")
            .route(web::post().to(create_sensor))
            .route(web::get().to(list_sensors)),
    );
    cfg.service(
        web::resource("/sensor/{deviceUuid}")
            .route(web::get().to(get_sensor))
            .route(web::patch().to(update_sensor))
            .route(web::delete().to(delete_sensor)),
    );
}

/// `POST /sensor`
pub async fn create_sensor(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: SensorForm = state.accept_as(&SENSOR, negotiation, body).await?;
    let new = NewSensor::from(form);
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(sensors::table)
            .values((&new, sensors::created_at.eq(stamp), sensors::updated_at.eq(stamp)))
            .returning(Sensor::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(device_uuid = %row.device_uuid, "sensor created");
    Reply::serialize(201, &row, SENSOR.tag)
}

/// `GET /sensor`
pub async fn list_sensors(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        sensors::table
            .order(sensors::device_uuid)
            .select(Sensor::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, SENSOR.tag));
    respond(&negotiation, outcome)
}

/// `GET /sensor/{deviceUuid}`
pub async fn get_sensor(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = find(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn find(state: &AppState, device_uuid: String) -> AppResult<Reply> {
    let row = run(&state.pool, move |conn| {
        sensors::table
            .find(device_uuid)
            .select(Sensor::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, SENSOR.tag)
}

/// `PATCH /sensor/{deviceUuid}`
///
/// `battery` and `description` keep their stored values when omitted.
pub async fn update_sensor(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, update(&state, &negotiation, path.into_inner(), body).await)
}

async fn update(
    state: &AppState,
    negotiation: &Negotiation,
    device_uuid: String,
    body: web::Bytes,
) -> AppResult<Reply> {
    let form: SensorForm = state.accept_as(&SENSOR, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(sensors::table.find(device_uuid))
            .set((&form, sensors::updated_at.eq(stamp)))
            .returning(Sensor::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, SENSOR.tag)
}

/// `DELETE /sensor/{deviceUuid}`
pub async fn delete_sensor(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = remove(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn remove(state: &AppState, device_uuid: String) -> AppResult<Reply> {
    let row = run(&state.pool, move |conn| {
        diesel::delete(sensors::table.find(device_uuid))
            .returning(Sensor::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(device_uuid = %row.device_uuid, "sensor deleted");
    Reply::serialize(200, &row, SENSOR.tag)
}
