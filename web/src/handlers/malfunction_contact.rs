use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::MALFUNCTION_CONTACT;
use sensorhub_core::{AppResult, Reply};

use super::{now, parse_id};
use crate::db::run;
use crate::models::{MalfunctionContact, MalfunctionContactForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::malfunction_contacts;
use crate::state::AppState;

/// Registers `/malfunctionContact` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/malfunctionContact")
            .route(web::post().to(create_malfunction_contact))
            .route(web::get().to(list_malfunction_contacts)),
    );
    cfg.service(
        web::resource("/malfunctionContact/{id}")
            .route(web::get().to(get_malfunction_contact))
            .route(web::patch().to(update_malfunction_contact))
            .route(web::delete().to(delete_malfunction_contact)),
    );
}

/// `POST /malfunctionContact`
pub async fn create_malfunction_contact(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: MalfunctionContactForm = state.accept_as(&MALFUNCTION_CONTACT, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(malfunction_contacts::table)
            .values((&form, malfunction_contacts::created_at.eq(stamp), malfunction_contacts::updated_at.eq(stamp)))
            .returning(MalfunctionContact::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "malfunction contact created");
    Reply::serialize(201, &row, MALFUNCTION_CONTACT.tag)
}

/// `GET /malfunctionContact`
pub async fn list_malfunction_contacts(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        malfunction_contacts::table
            .order(malfunction_contacts::id)
            .select(MalfunctionContact::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, MALFUNCTION_CONTACT.tag));
    respond(&negotiation, outcome)
}

/// `GET /malfunctionContact/{id}`
pub async fn get_malfunction_contact(
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
        malfunction_contacts::table
            .find(key)
            .select(MalfunctionContact::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, MALFUNCTION_CONTACT.tag)
}

/// `PATCH /malfunctionContact/{id}`
pub async fn update_malfunction_contact(
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
    let form: MalfunctionContactForm = state.accept_as(&MALFUNCTION_CONTACT, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(malfunction_contacts::table.find(key))
            .set((&form, malfunction_contacts::updated_at.eq(stamp)))
            .returning(MalfunctionContact::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, MALFUNCTION_CONTACT.tag)
}

/// `DELETE /malfunctionContact/{id}`
pub async fn delete_malfunction_contact(
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
        diesel::delete(malfunction_contacts::table.find(key))
            .returning(MalfunctionContact::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(id = row.id, "malfunction contact deleted");
    Reply::serialize(200, &row, MALFUNCTION_CONTACT.tag)
}
