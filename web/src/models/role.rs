use crate::schema::roles;

/// Struct representing a row in table `roles`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=roles, primary_key(id))]
pub struct Role {
    /// Field representing column `id`
    pub id: i32,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `roles`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=roles)]
pub struct RoleForm {
    /// Field representing column `name`
    pub name: String,
}
