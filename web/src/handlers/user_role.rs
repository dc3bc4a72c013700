//! Role assignments. There is no body: both ids come from the path.

use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::USER_ROLE_TAG;
use sensorhub_core::{AppResult, Reply};

use super::{now, parse_id};
use crate::db::run;
use crate::models::{NewUserRole, UserRole};
use crate::negotiation::{respond, Negotiation};
use crate::schema::user_roles;
use crate::state::AppState;

/// Registers `/userRole` routes.
///
/// The `user/` and `role/` listings are registered before the composite
/// resource so they win the match.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/userRole").route(web::get().to(list_user_roles)));
    cfg.service(
        web::resource("/userRole/user/{userId}").route(web::get().to(list_roles_of_user)),
    );
    cfg.service(
        web::resource("/userRole/role/{roleId}").route(web::get().to(list_users_with_role)),
    );
    cfg.service(
        web::resource("/userRole/{userId}/{roleId}")
            .route(web::post().to(assign_role))
            .route(web::delete().to(revoke_role)),
    );
}

fn parse_pair(raw: &(String, String)) -> AppResult<NewUserRole> {
    Ok(NewUserRole {
        user_id: parse_id(&raw.0)?,
        role_id: parse_id(&raw.1)?,
    })
}

/// `POST /userRole/{userId}/{roleId}`
pub async fn assign_role(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<(String, String)>,
) -> impl Responder {
    respond(&negotiation, assign(&state, &path).await)
}

async fn assign(state: &AppState, raw: &(String, String)) -> AppResult<Reply> {
    let new = parse_pair(raw)?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(user_roles::table)
            .values((&new, user_roles::created_at.eq(stamp), user_roles::updated_at.eq(stamp)))
            .returning(UserRole::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(user_id = row.user_id, role_id = row.role_id, "role assigned");
    Reply::serialize(201, &row, USER_ROLE_TAG)
}

/// `DELETE /userRole/{userId}/{roleId}`
pub async fn revoke_role(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<(String, String)>,
) -> impl Responder {
    respond(&negotiation, revoke(&state, &path).await)
}

async fn revoke(state: &AppState, raw: &(String, String)) -> AppResult<Reply> {
    let key = parse_pair(raw)?;
    let row = run(&state.pool, move |conn| {
        diesel::delete(user_roles::table.find((key.user_id, key.role_id)))
            .returning(UserRole::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(user_id = row.user_id, role_id = row.role_id, "role revoked");
    Reply::serialize(200, &row, USER_ROLE_TAG)
}

/// `GET /userRole`
pub async fn list_user_roles(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        user_roles::table
            .order((user_roles::user_id, user_roles::role_id))
            .select(UserRole::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, USER_ROLE_TAG));
    respond(&negotiation, outcome)
}

/// `GET /userRole/user/{userId}`
pub async fn list_roles_of_user(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    respond(&negotiation, roles_of_user(&state, &path).await)
}

async fn roles_of_user(state: &AppState, raw: &str) -> AppResult<Reply> {
    let user_id = parse_id(raw)?;
    let rows = run(&state.pool, move |conn| {
        user_roles::table
            .filter(user_roles::user_id.eq(user_id))
            .order(user_roles::role_id)
            .select(UserRole::as_select())
            .load(conn)
    })
    .await?;
    Reply::serialize(200, &rows, USER_ROLE_TAG)
}

/// `GET /userRole/role/{roleId}`
pub async fn list_users_with_role(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    respond(&negotiation, users_with_role(&state, &path).await)
}

async fn users_with_role(state: &AppState, raw: &str) -> AppResult<Reply> {
    let role_id = parse_id(raw)?;
    let rows = run(&state.pool, move |conn| {
        user_roles::table
            .filter(user_roles::role_id.eq(role_id))
            .order(user_roles::user_id)
            .select(UserRole::as_select())
            .load(conn)
    })
    .await?;
    Reply::serialize(200, &rows, USER_ROLE_TAG)
}
