use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::ROOM;
use sensorhub_core::{AppResult, Reply};

use super::{now, parse_id};
use crate::db::run;
use crate::models::{Room, RoomForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::rooms;
use crate::state::AppState;

/// Registers `/room` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/room")
            .route(web::post().to(create_room))
            .route(web::get().to(list_rooms)),
    );
    cfg.service(
        web::resource("/room/{id}")
            .route(web::get().to(get_room))
            .route(web::patch().to(update_room))
            .route(web::delete().to(delete_room)),
    );
}

/// `POST /room`
pub async fn create_room(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: RoomForm = state.accept_as(&ROOM, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(rooms::table)
            .values((&form, rooms::created_at.eq(stamp), rooms::updated_at.eq(stamp)))
            .returning(Room::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "room created");
    Reply::serialize(201, &row, ROOM.tag)
}

/// `GET /room`
pub async fn list_rooms(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        rooms::table
            .order(rooms::id)
            .select(Room::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, ROOM.tag));
    respond(&negotiation, outcome)
}

/// `GET /room/{id}`
pub async fn get_room(
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
        rooms::table
            .find(key)
            .select(Room::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, ROOM.tag)
}

/// `PATCH /room/{id}`
pub async fn update_room(
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
    let form: RoomForm = state.accept_as(&ROOM, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(rooms::table.find(key))
            .set((&form, rooms::updated_at.eq(stamp)))
            .returning(Room::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, ROOM.tag)
}

/// `DELETE /room/{id}`
pub async fn delete_room(
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
        diesel::delete(rooms::table.find(key))
            .returning(Room::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "room deleted");
    Reply::serialize(200, &row, ROOM.tag)
}
