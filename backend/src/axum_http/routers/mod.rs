pub mod categories;
pub mod certificates;
pub mod companies;
pub mod membership_types;
pub mod opinions;
pub mod payments;
pub mod roles;
pub mod system_settings;
pub mod users;
