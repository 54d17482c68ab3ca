//! Data source implementations

pub mod version;

pub use version::VersionDataSource;
