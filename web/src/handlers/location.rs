use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::LOCATION;
use sensorhub_core::{AppResult, Reply};

use super::{now, parse_id};
use crate::db::run;
use crate::models::{Location, LocationForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::locations;
use crate::state::AppState;

/// Registers `/location` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/location")
            .route(web::post().to(create_location))
            .route(web::get().to(list_locations)),
    );
    cfg.service(
        web::resource("/location/{id}")
            .route(web::get().to(get_location))
            .route(web::patch().to(update_location))
            .route(web::delete().to(delete_location)),
    );
}

/// `POST /location`
pub async fn create_location(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: LocationForm = state.accept_as(&LOCATION, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(locations::table)
            .values((&form, locations::created_at.eq(stamp), locations::updated_at.eq(stamp)))
            .returning(Location::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "location created");
    Reply::serialize(201, &row, LOCATION.tag)
}

/// `GET /location`
pub async fn list_locations(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        locations::table
            .order(locations::id)
            .select(Location::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, LOCATION.tag));
    respond(&negotiation, outcome)
}

/// `GET /location/{id}`
pub async fn get_location(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = find(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn find(state: &AppState, raw: String) -> AppResult<Reply> {
    let key = parse_id(&raw)?;
    let row = run(&state.pool, move |conn| {
        locations::table
            .find(key)
            .select(Location::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, LOCATION.tag)
}

/// `PATCH /location/{id}`
pub async fn update_location(
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
    raw: String,
    body: web::Bytes,
) -> AppResult<Reply> {
    let key = parse_id(&raw)?;
    let form: LocationForm = state.accept_as(&LOCATION, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(locations::table.find(key))
            .set((&form, locations::updated_at.eq(stamp)))
            .returning(Location::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, LOCATION.tag)
}

/// `DELETE /location/{id}`
pub async fn delete_location(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = remove(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn remove(state: &AppState, raw: String) -> AppResult<Reply> {
    let key = parse_id(&raw)?;
    let row = run(&state.pool, move |conn| {
        diesel::delete(locations::table.find(key))
            .returning(Location::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "location deleted");
    Reply::serialize(200, &row, LOCATION.tag)
}
