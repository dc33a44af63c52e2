//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → CLI flags / environment override individual fields
//!     → RelayConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - The forward address is validated into host/port at startup; a bad
//!   address is fatal before the listener ever binds

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{ForwardTarget, RelayConfig};
