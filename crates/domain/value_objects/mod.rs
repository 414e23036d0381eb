pub mod categories;
pub mod certificates;
pub mod companies;
pub mod enums;
pub mod iam;
pub mod membership_payments;
pub mod membership_types;
pub mod opinions;
pub mod roles;
pub mod system_settings;
pub mod validation;
