//! tfbridge - Terraform provider framework types for Rust
//!
//! The type system, schema builders, diagnostics and trait families used to
//! build Terraform providers. The wire protocol server is out of scope here;
//! this crate covers everything between provider configuration and the
//! resource CRUD contract.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfbridgeError};
pub use import::import_state_passthrough_id;
pub use provider::{Provider, ProviderSchemaRequest, ProviderSchemaResponse};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, BlockBuilder, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, DiagnosticSeverity, Dynamic, DynamicValue};
