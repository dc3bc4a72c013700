use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::USER;
use sensorhub_core::{AppError, AppResult, Reply};

use super::{now, parse_id};
use crate::db::run;
use crate::models::{NewUser, User, UserForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::users;
use crate::state::AppState;

/// Registers `/user` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/user")
            .route(web::post().to(create_user))
            .route(web::get().to(list_users)),
    );
    cfg.service(
        web::resource("/user/{id}")
            .route(web::get().to(get_user))
            .route(web::patch().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}

/// Validates the payload and hashes its password off the async workers.
async fn accept_user(
    state: &AppState,
    negotiation: &Negotiation,
    body: web::Bytes,
) -> AppResult<NewUser> {
    let form: UserForm = state.accept_as(&USER, negotiation, body).await?;
    web::block(move || form.into_new())
        .await
        .map_err(|e| AppError::General(e.to_string()))?
}

/// `POST /user`
pub async fn create_user(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let new = accept_user(state, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(users::table)
            .values((&new, users::created_at.eq(stamp), users::updated_at.eq(stamp)))
            .returning(User::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "user created");
    Reply::serialize(201, &row, USER.tag)
}

/// `GET /user`
pub async fn list_users(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        users::table
            .order(users::id)
            .select(User::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, USER.tag));
    respond(&negotiation, outcome)
}

/// `GET /user/{id}`
pub async fn get_user(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    respond(&negotiation, find(&state, path.into_inner()).await)
}

async fn find(state: &AppState, raw: String) -> AppResult<Reply> {
    let id = parse_id(&raw)?;
    let row = run(&state.pool, move |conn| {
        users::table.find(id).select(User::as_select()).first(conn)
    })
    .await?;
    Reply::serialize(200, &row, USER.tag)
}

/// `PATCH /user/{id}`
///
/// The full payload is required, password included; it is rehashed.
pub async fn update_user(
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
    let id = parse_id(&raw)?;
    let changes = accept_user(state, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(users::table.find(id))
            .set((&changes, users::updated_at.eq(stamp)))
            .returning(User::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, USER.tag)
}

/// `DELETE /user/{id}`
pub async fn delete_user(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    respond(&negotiation, remove(&state, path.into_inner()).await)
}

async fn remove(state: &AppState, raw: String) -> AppResult<Reply> {
    let id = parse_id(&raw)?;
    let row = run(&state.pool, move |conn| {
        diesel::delete(users::table.find(id))
            .returning(User::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "user deleted");
    Reply::serialize(200, &row, USER.tag)
}
