use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::MEASUREMENT_TYPE;
use sensorhub_core::{AppResult, Reply};

use super::now;
use crate::db::run;
use crate::models::{MeasurementType, MeasurementTypeForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::types;
use crate::state::AppState;

/// Registers `/type` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/type")
            .route(web::post().to(create_type))
            .route(web::get().to(list_types)),
    );
    cfg.service(
        web::resource("/type/{name}")
            .route(web::get().to(get_type))
            .route(web::patch().to(update_type))
            .route(web::delete().to(delete_type)),
    );
}

/// `POST /type`
pub async fn create_type(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: MeasurementTypeForm = state.accept_as(&MEASUREMENT_TYPE, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(types::table)
            .values((&form, types::created_at.eq(stamp), types::updated_at.eq(stamp)))
            .returning(MeasurementType::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(name = %row.name, "measurement type created");
    Reply::serialize(201, &row, MEASUREMENT_TYPE.tag)
}

/// `GET /type`
pub async fn list_types(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        types::table
            .order(types::name)
            .select(MeasurementType::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, MEASUREMENT_TYPE.tag));
    respond(&negotiation, outcome)
}

/// `GET /type/{name}`
pub async fn get_type(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = find(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn find(state: &AppState, name: String) -> AppResult<Reply> {
    let row = run(&state.pool, move |conn| {
        types::table
            .find(name)
            .select(MeasurementType::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, MEASUREMENT_TYPE.tag)
}

/// `PATCH /type/{name}`
pub async fn update_type(
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
    name: String,
    body: web::Bytes,
) -> AppResult<Reply> {
    let form: MeasurementTypeForm = state.accept_as(&MEASUREMENT_TYPE, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(types::table.find(name))
            .set((&form, types::updated_at.eq(stamp)))
            .returning(MeasurementType::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, MEASUREMENT_TYPE.tag)
}

/// `DELETE /type/{name}`
pub async fn delete_type(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = remove(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn remove(state: &AppState, name: String) -> AppResult<Reply> {
    let row = run(&state.pool, move |conn| {
        diesel::delete(types::table.find(name))
            .returning(MeasurementType::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(name = %row.name, "measurement type deleted");
    Reply::serialize(200, &row, MEASUREMENT_TYPE.tag)
}
