//! Route handlers, one module per resource.
//!
//! Every handler follows the same sequence: extract the negotiation headers,
//! run the pipeline on the body (if any), perform one database operation and
//! render the outcome exactly once through [`respond`](crate::negotiation::respond).

use actix_web::web;
use sensorhub_core::{AppError, AppResult};

/// `/company`
pub mod company;
/// `/location`
pub mod location;
/// `/malfunctionContact`
pub mod malfunction_contact;
/// `/measurement`
pub mod measurement;
/// `/type`
pub mod measurement_type;
/// `/role`
pub mod role;
/// `/room`
pub mod room;
/// `/sensor`
pub mod sensor;
/// `/sensorTypeThreshold`
pub mod sensor_type_threshold;
/// `/user`
pub mod user;
/// `/userRole`
pub mod user_role;

/// Message for unusable path parameters.
pub const INVALID_REQUEST: &str = "Invalid request";

/// Registers every resource.
pub fn config(cfg: &mut web::ServiceConfig) {
    company::config(cfg);
    location::config(cfg);
    room::config(cfg);
    sensor::config(cfg);
    measurement_type::config(cfg);
    sensor_type_threshold::config(cfg);
    malfunction_contact::config(cfg);
    measurement::config(cfg);
    role::config(cfg);
    user::config(cfg);
    user_role::config(cfg);
}

/// Parses a positive integer id from a path segment.
pub fn parse_id(raw: &str) -> AppResult<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(INVALID_REQUEST.into())),
    }
}

/// Current time for `created_at`/`updated_at`.
pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7").unwrap(), 7);
        for raw in ["0", "-3", "abc", "", "1.5", "99999999999"] {
            assert!(
                matches!(parse_id(raw), Err(AppError::BadRequest(ref m)) if m == INVALID_REQUEST),
                "{raw}"
            );
        }
    }
}
