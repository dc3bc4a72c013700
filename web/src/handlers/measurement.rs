//! Measurements are append-only: no update route, and deletion removes every
//! reading of one device.

use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::reply::MESSAGE_TAG;
use sensorhub_core::resources::MEASUREMENT;
use sensorhub_core::{AppResult, Reply};

use super::now;
use crate::db::run;
use crate::models::{Measurement, MeasurementForm, NewMeasurement};
use crate::negotiation::{respond, Negotiation};
use crate::schema::measurements;
use crate::state::AppState;

/// Registers `/measurement` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/measurement")
            .route(web::post().to(create_measurement))
            .route(web::get().to(list_measurements)),
    );
    cfg.service(
        web::resource("/measurement/{deviceUuid}")
            .route(web::get().to(list_device_measurements))
            .route(web::delete().to(delete_device_measurements)),
    );
    cfg.service(
        web::resource("/measurement/{deviceUuid}/{typeName}")
            .route(web::get().to(list_device_type_measurements)),
    );
}

/// `POST /measurement`
pub async fn create_measurement(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: MeasurementForm = state.accept_as(&MEASUREMENT, negotiation, body).await?;
    let new = NewMeasurement::try_from(form)?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(measurements::table)
            .values((&new, measurements::created_at.eq(stamp), measurements::updated_at.eq(stamp)))
            .returning(Measurement::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::debug!(id = row.id, device_uuid = %row.sensor_device_uuid, "measurement stored");
    Reply::serialize(201, &row, MEASUREMENT.tag)
}

/// `GET /measurement`, newest first.
pub async fn list_measurements(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        measurements::table
            .order(measurements::timestamp.desc())
            .select(Measurement::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, MEASUREMENT.tag));
    respond(&negotiation, outcome)
}

/// `GET /measurement/{deviceUuid}`, newest first.
pub async fn list_device_measurements(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let device_uuid = path.into_inner();
    let outcome = run(&state.pool, move |conn| {
        measurements::table
            .filter(measurements::sensor_device_uuid.eq(device_uuid))
            .order(measurements::timestamp.desc())
            .select(Measurement::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, MEASUREMENT.tag));
    respond(&negotiation, outcome)
}

/// `GET /measurement/{deviceUuid}/{typeName}`, newest first.
pub async fn list_device_type_measurements(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (device_uuid, type_name) = path.into_inner();
    let outcome = run(&state.pool, move |conn| {
        measurements::table
            .filter(measurements::sensor_device_uuid.eq(device_uuid))
            .filter(measurements::type_name.eq(type_name))
            .order(measurements::timestamp.desc())
            .select(Measurement::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, MEASUREMENT.tag));
    respond(&negotiation, outcome)
}

/// `DELETE /measurement/{deviceUuid}`
///
/// Answers with the number of deleted rows; zero is not an error.
pub async fn delete_device_measurements(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let device_uuid = path.into_inner();
    let outcome = run(&state.pool, move |conn| {
        diesel::delete(measurements::table.filter(measurements::sensor_device_uuid.eq(device_uuid)))
            .execute(conn)
    })
    .await
    .map(|count| {
        tracing::info!(count, "measurements deleted");
        Reply::ok(format!("{count} rows affected"), MESSAGE_TAG)
    });
    respond(&negotiation, outcome)
}
