use crate::schema::malfunction_contacts;

/// Struct representing a row in table `malfunction_contacts`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=malfunction_contacts, primary_key(id))]
pub struct MalfunctionContact {
    /// Field representing column `id`
    pub id: i32,
    /// Field representing column `incident_id`
    pub incident_id: i32,
    /// Field representing column `sensor_device_uuid`
    pub sensor_device_uuid: String,
    /// Field representing column `type_name`
    pub type_name: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `malfunction_contacts`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=malfunction_contacts)]
pub struct MalfunctionContactForm {
    /// Field representing column `incident_id`
    pub incident_id: i32,
    /// Field representing column `sensor_device_uuid`
    pub sensor_device_uuid: String,
    /// Field representing column `type_name`
    pub type_name: String,
}
