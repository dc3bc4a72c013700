#![deny(missing_docs)]

//! # Sensorhub Web Binary
//!
//! Entry point for the Actix Web server.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use sensorhub_core::resources::builtin_registry;
use sensorhub_core::{LocalXsdValidator, Pipeline, XmlSchemaValidator};
use sensorhub_web::config::ServerConfig;
use sensorhub_web::db::build_pool;
use sensorhub_web::{configure, not_found, AppState};
use tracing_subscriber::EnvFilter;

fn build_server(listener: TcpListener, state: AppState) -> std::io::Result<actix_web::dev::Server> {
    let data = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .default_service(web::to(not_found))
    })
    .listen(listener)?
    .run())
}

fn build_pipeline(config: &ServerConfig) -> std::io::Result<Pipeline> {
    let xsd: Arc<dyn XmlSchemaValidator> = match &config.xsd_service_url {
        Some(url) => {
            tracing::info!(%url, "validating XML payloads through the schema service");
            Arc::new(sensorhub_core::xsd::remote::RemoteXsdValidator::new(
                url,
                config.xsd_timeout(),
            ))
        }
        None => Arc::new(LocalXsdValidator::builtin().map_err(std::io::Error::other)?),
    };
    let schemas = builtin_registry().map_err(std::io::Error::other)?;
    Ok(Pipeline::new(schemas, xsd))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::parse();
    let pipeline = build_pipeline(&config)?;
    let pool = build_pool(&config.database_url, config.db_pool_size);

    let listener = TcpListener::bind(config.bind_addr())?;
    tracing::info!(addr = %listener.local_addr()?, "sensorhub listening");
    build_server(listener, AppState::new(pool, pipeline))?.await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(xsd_service_url: Option<&str>) -> ServerConfig {
        let mut args = vec!["sensorhub-web", "--database-url", "postgres://localhost/x"];
        if let Some(url) = xsd_service_url {
            args.extend(["--xsd-service-url", url]);
        }
        ServerConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_build_pipeline() {
        assert!(build_pipeline(&config(None)).is_ok());
        assert!(build_pipeline(&config(Some("http://127.0.0.1:9"))).is_ok());
    }

    #[actix_web::test]
    async fn test_build_server_start_stop() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let state = AppState::new(
            build_pool("postgres://nobody@127.0.0.1:9/nothing", 1),
            Pipeline::builtin().unwrap(),
        );
        let server = build_server(listener, state).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;
    }
}
