//! Data models for HashPilot.
//!
//! - [`AppState`]: the central state container - form configuration,
//!   running-session flags, and user settings
//! - [`UserConfig`]: remembered settings from `HashPilot Settings.yaml`
//! - [`CatalogConfig`]: combo-box catalogs (hash types, attack modes) from
//!   `HashPilot Catalog.yaml`
//!
//! Config structs derive `Serialize`/`Deserialize` for YAML persistence.
//! `AppState` is wrapped in `Arc<RwLock<>>` by
//! [`StateManager`](crate::state::StateManager); all mutation goes through
//! its `update()` method so change events stay consistent.

pub mod app_state;
pub mod config;

pub use app_state::AppState;
pub use config::{Catalog, CatalogConfig, HashcatSettings, UserConfig};
