use crate::schema::companies;

/// Struct representing a row in table `companies`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Identifiable,
)]
#[diesel(table_name=companies, primary_key(name))]
pub struct Company {
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `representative_name`
    pub representative_name: String,
    /// Field representing column `representative_email`
    pub representative_email: String,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create and update struct for table `companies`
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Deserialize,
    diesel::Insertable,
    diesel::AsChangeset,
)]
#[diesel(table_name=companies)]
pub struct CompanyForm {
    /// Field representing column `name`
    pub name: String,
    /// Field representing column `representative_name`
    pub representative_name: String,
    /// Field representing column `representative_email`
    pub representative_email: String,
}
