use actix_web::{web, Responder};
use diesel::prelude::*;
use sensorhub_core::resources::COMPANY;
use sensorhub_core::{AppResult, Reply};

use super::now;
use crate::db::run;
use crate::models::{Company, CompanyForm};
use crate::negotiation::{respond, Negotiation};
use crate::schema::companies;
use crate::state::AppState;

/// Registers `/company` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/company")
            .route(web::post().to(create_company))
            .route(web::get().to(list_companies)),
    );
    cfg.service(
        web::resource("/company/{name}")
            .route(web::get().to(get_company))
            .route(web::patch().to(update_company))
            .route(web::delete().to(delete_company)),
    );
}

/// `POST /company`
pub async fn create_company(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    body: web::Bytes,
) -> impl Responder {
    respond(&negotiation, create(&state, &negotiation, body).await)
}

async fn create(state: &AppState, negotiation: &Negotiation, body: web::Bytes) -> AppResult<Reply> {
    let form: CompanyForm = state.accept_as(&COMPANY, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::insert_into(companies::table)
            .values((&form, companies::created_at.eq(stamp), companies::updated_at.eq(stamp)))
            .returning(Company::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(name = %row.name, "company created");
    Reply::serialize(201, &row, COMPANY.tag)
}

/// `GET /company`
pub async fn list_companies(state: web::Data<AppState>, negotiation: Negotiation) -> impl Responder {
    let outcome = run(&state.pool, |conn| {
        companies::table
            .order(companies::name)
            .select(Company::as_select())
            .load(conn)
    })
    .await
    .and_then(|rows| Reply::serialize(200, &rows, COMPANY.tag));
    respond(&negotiation, outcome)
}

/// `GET /company/{name}`
pub async fn get_company(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = find(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn find(state: &AppState, name: String) -> AppResult<Reply> {
    let row = run(&state.pool, move |conn| {
        companies::table
            .find(name)
            .select(Company::as_select())
            .first(conn)
    })
    .await?;
    Reply::serialize(200, &row, COMPANY.tag)
}

/// `PATCH /company/{name}`
pub async fn update_company(
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
    let form: CompanyForm = state.accept_as(&COMPANY, negotiation, body).await?;
    let stamp = now();
    let row = run(&state.pool, move |conn| {
        diesel::update(companies::table.find(name))
            .set((&form, companies::updated_at.eq(stamp)))
            .returning(Company::as_returning())
            .get_result(conn)
    })
    .await?;
    Reply::serialize(200, &row, COMPANY.tag)
}

/// `DELETE /company/{name}`
pub async fn delete_company(
    state: web::Data<AppState>,
    negotiation: Negotiation,
    path: web::Path<String>,
) -> impl Responder {
    let outcome = remove(&state, path.into_inner()).await;
    respond(&negotiation, outcome)
}

async fn remove(state: &AppState, name: String) -> AppResult<Reply> {
    let row = run(&state.pool, move |conn| {
        diesel::delete(companies::table.find(name))
            .returning(Company::as_returning())
            .get_result(conn)
    })
    .await?;
    tracing::info!(name = %row.name, "company deleted");
    Reply::serialize(200, &row, COMPANY.tag)
}
