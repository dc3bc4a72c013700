use crate::schema::types;

/// Struct representing a row in table `types`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=types, primary_key(name))]
pub struct MeasurementType {
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `description`
    pub description: String,
    /// Field representing column `measurement_unit`
    pub measurement_unit: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `types`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=types)]
pub struct MeasurementTypeForm {
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `description`
    pub description: String,
    /// Field representing column `measurement_unit`
    pub measurement_unit: String,
}
