//! State shared by every worker: the pool and the request pipeline.

use actix_web::web;
use serde::de::DeserializeOwned;
use sensorhub_core::{AppError, AppResult, Pipeline, ResourceSpec};

use crate::db::DbPool;
use crate::negotiation::Negotiation;

/// Application state, registered once as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Database connections.
    pub pool: DbPool,
    /// Decoder and validators.
    pub pipeline: Pipeline,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pool", &self.pool.state())
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl AppState {
    /// Bundles a pool and a pipeline.
    pub fn new(pool: DbPool, pipeline: Pipeline) -> Self {
        Self { pool, pipeline }
    }

    /// Decodes, validates and deserializes a request body.
    ///
    /// Runs on the blocking pool since XML validation may call out to the
    /// schema service.
    pub async fn accept_as<T>(
        &self,
        resource: &'static ResourceSpec,
        negotiation: &Negotiation,
        body: web::Bytes,
    ) -> AppResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pipeline = self.pipeline.clone();
        let content_type = negotiation.content_type().map(str::to_owned);
        web::block(move || pipeline.accept_as::<T>(resource, content_type.as_deref(), &body))
            .await
            .map_err(|e| AppError::General(e.to_string()))?
    }
}
