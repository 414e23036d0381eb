pub mod company_statuses;
pub mod opinion_statuses;
pub mod payment_statuses;
pub mod periodicities;
pub mod record_statuses;
pub mod user_roles;
pub mod visibilities;
