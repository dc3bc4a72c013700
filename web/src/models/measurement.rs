use chrono::{DateTime, Utc};
use sensorhub_core::{AppError, AppResult};

use crate::schema::measurements;

/// Struct representing a row in table `measurements`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=measurements, primary_key(id))]
pub struct Measurement {
    /// Field representing column `id`
    pub id: i32,
    /// Field representing column `value`
    pub value: f64,
    /// Field representing column `timestamp`
    pub timestamp: DateTime<Utc>,
    /// Field representing column `sensor_device_uuid`
    pub sensor_device_uuid: String,
    /// Field representing column `type_name`
    pub type_name: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Validated measurement payload; `timestamp` is Unix time in seconds.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MeasurementForm {
    /// Measured value.
    pub value: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Sensor (device identifier).
    pub sensor_device_uuid: String,
    /// Measurement type name.
    pub type_name: String,
}

/// Create Struct for a row in table `measurements` for [`Measurement`]
#[derive(Debug, Clone, PartialEq, diesel::Insertable)]
#[diesel(table_name=measurements)]
pub struct NewMeasurement {
    /// Field representing column `value`
    pub value: f64,
    /// Field representing column `timestamp`
    pub timestamp: DateTime<Utc>,
    /// Field representing column `sensor_device_uuid`
    pub sensor_device_uuid: String,
    /// Field representing column `type_name`
    pub type_name: String,
}

impl TryFrom<MeasurementForm> for NewMeasurement {
    type Error = AppError;

    fn try_from(form: MeasurementForm) -> AppResult<Self> {
        let timestamp = DateTime::from_timestamp(form.timestamp, 0).ok_or_else(|| {
            AppError::BadRequest(format!("timestamp {} is out of range", form.timestamp))
        })?;
        Ok(Self {
            value: form.value,
            timestamp,
            sensor_device_uuid: form.sensor_device_uuid,
            type_name: form.type_name,
        })
    }
}
