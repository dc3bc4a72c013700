use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::ROLE;
use sensorhub_core::{AppResult, Reply};

use super::{now, parse_id};
use crate::db::run;
use crate::models::{Role, RoleForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::roles;
use crate::state::AppState;

/// Registers `/role` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/role")
            .route(web::post().to(create_role))
            .route(web::get().to(list_roles)),
    );
    cfg.service(
        web::resource("/role/{id}")
            .route(web::get().to(get_role))
            .route(web::patch().to(update_role))
            .route(web::delete().to(delete_role)),
    );
}

/// `POST /role`
pub async fn create_role(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: RoleForm = state.accept_as(&ROLE, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(roles::table)
            .values((&form, roles::created_at.eq(stamp), roles::updated_at.eq(stamp)))
            .returning(Role::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "role created");
    Reply::serialize(201, &row, ROLE.tag)
}

/// `GET /role`
pub async fn list_roles(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        roles::table
            .order(roles::id)
            .select(Role::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, ROLE.tag));
    respond(&negotiation, outcome)
}

/// `GET /role/{id}`
pub async fn get_role(
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
        roles::table
            .find(key)
            .select(Role::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, ROLE.tag)
}

/// `PATCH /role/{id}`
pub async fn update_role(
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
    let form: RoleForm = state.accept_as(&ROLE, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(roles::table.find(key))
            .set((&form, roles::updated_at.eq(stamp)))
            .returning(Role::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, ROLE.tag)
}

/// `DELETE /role/{id}`
pub async fn delete_role(
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
        diesel::delete(roles::table.find(key))
            .returning(Role::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "role deleted");
    Reply::serialize(200, &row, ROLE.tag)
}
