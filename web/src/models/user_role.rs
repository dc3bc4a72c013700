use crate::schema::user_roles;

/// Struct representing a row in table `user_roles`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=user_roles, primary_key(user_id, role_id))]
pub struct UserRole {
    /// Field representing column `user_id`
    pub user_id: i32,
    /// Field representing column `role_id`
    pub role_id: i32,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create struct for table `user_roles`, built from path parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, diesel::Insertable)]
#[diesel(table_name=user_roles)]
pub struct NewUserRole {
    /// Field representing column `user_id`
    pub user_id: i32,
    /// Field representing column `role_id`
    pub role_id: i32,
}
