use crate::schema::sensor_type_thresholds;

/// Struct representing a row in table `sensor_type_thresholds`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=sensor_type_thresholds, primary_key(sensor_device_uuid, type_name))]
pub struct SensorTypeThreshold {
    /// Field representing column `sensor_device_uuid`
    pub sensor_device_uuid: String,
    /// Field representing column `type_name`
    pub type_name: String,
    /// Field representing column `min_value`
    pub min_value: f64,
    /// Field representing column `max_value`
    pub max_value: f64,
    /// Field representing column `duration`
    pub duration: i32,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `sensor_type_thresholds`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=sensor_type_thresholds)]
pub struct SensorTypeThresholdForm {
    /// Field representing column `sensor_device_uuid`
    pub sensor_device_uuid: String,
    /// Field representing column `type_name`
    pub type_name: String,
    /// Field representing column `min_value`
    pub min_value: f64,
    /// Field representing column `max_value`
    pub max_value: f64,
    /// Field representing column `duration`
    pub duration: i32,
}
