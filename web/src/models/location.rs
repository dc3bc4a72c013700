use crate::schema::locations;

/// Struct representing a row in table `locations`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=locations, primary_key(id))]
pub struct Location {
    /// Field representing column `id`
    pub id: i32,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `type`
    #[serde(rename = "type")]
    pub location_type: String,
    /// Field representing column `street`
    pub street: String,
    /// Field representing column `number`
    pub number: String,
    /// Field representing column `city`
    pub city: String,
    /// Field representing column `company`
    pub company: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `locations`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=locations)]
pub struct LocationForm {
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `type`
    #[serde(rename = "type")]
    pub location_type: String,
    /// Field representing column `street`
    pub street: String,
    /// Field representing column `number`
    pub number: String,
    /// Field representing column `city`
    pub city: String,
    /// Field representing column `company`
    pub company: String,
}
