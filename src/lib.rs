// HashPilot - a desktop front-end for hashcat
//
// Configures a hashcat session in a small Slint window, launches the tool as
// a child process, and streams its output into a read-only console while a
// status strip tracks the latest Status/Recovered values.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use config::ConfigManager;
pub use metrics::Metrics;
pub use models::{AppState, Catalog, CatalogConfig, HashcatSettings, UserConfig};
pub use services::{
    AttackMode, CrackConfiguration, LaunchCommand, MonitorEvent, MonitorState, ProcessMonitor,
    StatusScanner, StatusUpdate, ValidationError,
};
pub use state::{StateChange, StateManager};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "HashPilot";
