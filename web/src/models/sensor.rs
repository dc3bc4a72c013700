use crate::schema::sensors;

/// Battery level recorded for sensors created without one.
pub const DEFAULT_BATTERY: i32 = 100;

/// Struct representing a row in table `sensors`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=sensors, primary_key(device_uuid))]
pub struct Sensor {
    /// Field representing column `device_uuid`
    pub device_uuid: String,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `battery`
    pub battery: i32,
    /// Field representing column `room_id`
    pub room_id: i32,
    /// Field representing column `description`
    pub description: Option<String>,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Validated sensor payload. Doubles as the update changeset: absent
/// optional fields leave their columns untouched.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, diesel::AsChangeset)]
#[diesel(table_name=sensors)]
pub struct SensorForm {
    /// Field representing column `device_uuid`
    pub device_uuid: String,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `battery`
    #[serde(default)]
    pub battery: Option<i32>,
    /// Field representing column `room_id`
    pub room_id: i32,
    /// Field representing column `description`
    #[serde(default)]
    pub description: Option<String>,
}

/// Create Struct for a row in table `sensors` for [`Sensor`]
#[derive(Debug, Clone, PartialEq, diesel::Insertable)]
#[diesel(table_name=sensors)]
pub struct NewSensor {
    /// Field representing column `device_uuid`
    pub device_uuid: String,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `battery`
    pub battery: i32,
    /// Field representing column `room_id`
    pub room_id: i32,
    /// Field representing column `description`
    pub description: Option<String>,
}

impl From<SensorForm> for NewSensor {
    fn from(form: SensorForm) -> Self {
        Self {
            device_uuid: form.device_uuid,
            name: form.name,
            battery: form.battery.unwrap_or(DEFAULT_BATTERY),
            room_id: form.room_id,
            description: form.description,
        }
    }
}
