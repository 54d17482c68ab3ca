//! Resource implementations

pub mod account;
pub mod configuration_profile;
pub mod distribution_point;
pub mod package;
pub mod webhook;

pub use account::AccountResource;
pub use configuration_profile::ConfigurationProfileResource;
pub use distribution_point::DistributionPointResource;
pub use package::PackageResource;
pub use webhook::WebhookResource;
