use crate::schema::rooms;

/// Struct representing a row in table `rooms`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=rooms, primary_key(id))]
pub struct Room {
    /// Field representing column `id`
    pub id: i32,
    /// Field representing column `location_id`
    pub location_id: i32,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `floor`
    pub floor: i32,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `rooms`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=rooms)]
pub struct RoomForm {
    /// Field representing column `location_id`
    pub location_id: i32,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `floor`
    pub floor: i32,
}
