//! Row, insert and update structs for every table.
//!
//! Row structs serialize with storage (snake_case) names; the response
//! formatter rewrites them to wire case. Form structs deserialize from the
//! storage-keyed record produced by [`sensorhub_core::Pipeline::accept_as`].

/// `companies`
pub mod company;
/// `locations`
pub mod location;
/// `malfunction_contacts`
pub mod malfunction_contact;
/// `measurements`
pub mod measurement;
/// `types`
pub mod measurement_type;
/// `roles`
pub mod role;
/// `rooms`
pub mod room;
/// `sensors`
pub mod sensor;
/// `sensor_type_thresholds`
pub mod sensor_type_threshold;
/// `users`
pub mod user;
/// `user_roles`
pub mod user_role;

pub use company::{Company, CompanyForm};
pub use location::{Location, LocationForm};
pub use malfunction_contact::{MalfunctionContact, MalfunctionContactForm};
pub use measurement::{Measurement, MeasurementForm, NewMeasurement};
pub use measurement_type::{MeasurementType, MeasurementTypeForm};
pub use role::{Role, RoleForm};
pub use room::{Room, RoomForm};
pub use sensor::{NewSensor, Sensor, SensorForm, DEFAULT_BATTERY};
pub use sensor_type_threshold::{SensorTypeThreshold, SensorTypeThresholdForm};
pub use user::{NewUser, User, UserForm};
pub use user_role::{NewUserRole, UserRole};
