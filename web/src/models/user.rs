use sensorhub_core::AppResult;

use crate::password::hash_password;
use crate::schema::users;

/// Struct representing a row in table `users`
///
/// The password hash is never serialized.
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=users, primary_key(id))]
pub struct User {
    /// Field representing column `id`
    pub id: i32,
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `email`
    pub email: String,
    /// Field representing column `phone_number`
    pub phone_number: String,
    /// Field representing column `password`
    #[serde(skip_serializing)]
    pub password: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Validated user payload carrying the plain-text password.
#[derive(Clone, PartialEq, serde::Deserialize)]
pub struct UserForm {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone_number: String,
    /// Plain-text password.
    pub password: String,
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish_non_exhaustive()
    }
}

impl UserForm {
    /// Replaces the plain-text password with its hash.
    pub fn into_new(self) -> AppResult<NewUser> {
        Ok(NewUser {
            password: hash_password(&self.password)?,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
        })
    }
}

/// Create and update struct for table `users`
#[derive(Debug, Clone, PartialEq, diesel::Insertable, diesel::AsChangeset)]
#[diesel(table_name=users)]
pub struct NewUser {
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `email`
    pub email: String,
    /// Field representing column `phone_number`
    pub phone_number: String,
    /// Field representing column `password`
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    fn form() -> UserForm {
        UserForm {
            name: "Ada".into(),
            email: "ada@acme.io".into(),
            phone_number: "+31 6 1234 5678".into(),
            password: "correct horse".into(),
        }
    }

    #[test]
    fn test_into_new_hashes_password() {
        let new = form().into_new().unwrap();
        assert_ne!(new.password, "correct horse");
        assert!(new.password.starts_with("$argon2"));
        assert!(verify_password("correct horse", &new.password).unwrap());
    }

    #[test]
    fn test_debug_omits_password() {
        assert!(!format!("{:?}", form()).contains("correct horse"));
    }

    #[test]
    fn test_row_never_serializes_password() {
        let now = chrono::Utc::now().naive_utc();
        let user = User {
            id: 1,
            name: "Ada".into(),
            email: "ada@acme.io".into(),
            phone_number: "+31 6 1234 5678".into(),
            password: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["phone_number"], "+31 6 1234 5678");
    }
}
