//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, sanitize, env fallback)
//!     → validation.rs (semantic checks, resolve ValidationPolicy)
//!     → store.rs (PolicyStore, shared via Arc to the middleware)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<ValidationPolicy>
//!     → next request takes the new snapshot
//! ```
//!
//! # Design Decisions
//! - A missing auth token fails at load time, never per request
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, ObservabilityConfig, RequestValidationConfig, ServerConfig, TwilioConfig};
pub use store::PolicyStore;
pub use validation::resolve_policy;
