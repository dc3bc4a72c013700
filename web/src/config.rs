//! Server settings, read from flags or the environment (`.env` included).

use std::time::Duration;

use clap::Parser;

/// Runtime configuration of the HTTP server.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Sensorhub building monitoring API server")]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    #[clap(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Interface to bind.
    #[clap(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[clap(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum number of pooled database connections.
    #[clap(long, env = "DB_POOL_SIZE", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub db_pool_size: u32,

    /// Base URL of an XML-Schema validation service. When unset, XML
    /// payloads are checked in-process against the built-in schemas.
    #[clap(long, env = "XSD_SERVICE_URL")]
    pub xsd_service_url: Option<String>,

    /// Timeout for one call to the XML-Schema service, in seconds.
    #[clap(long, env = "XSD_TIMEOUT_SECS", default_value_t = 5)]
    pub xsd_timeout_secs: u64,
}

impl ServerConfig {
    /// `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout for the XML-Schema service.
    pub fn xsd_timeout(&self) -> Duration {
        Duration::from_secs(self.xsd_timeout_secs)
    }
}
