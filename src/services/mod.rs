//! Services module - core session logic, independent of the UI layer.
//!
//! - [`CrackConfiguration`] / [`LaunchCommand`]: an immutable snapshot of
//!   the form input and the deterministic hashcat command built from it.
//! - [`ProcessMonitor`]: owns the spawned hashcat process and streams its
//!   merged stdout/stderr as line events until the process exits.
//! - [`StatusScanner`]: regex scan of output lines for the status strip.
//!
//! Nothing in here touches Slint; everything is driven through explicit
//! parameters and channels, which is what keeps it testable against
//! scripted child processes.

pub mod command;
pub mod monitor;
pub mod status;

pub use command::{
    AttackMode, CrackConfiguration, LaunchCommand, ValidationError, DEFAULT_HASHCAT_EXE,
    STATUS_TIMER_SECS,
};
pub use monitor::{MonitorError, MonitorEvent, MonitorState, ProcessMonitor};
pub use status::{StatusScanner, StatusUpdate};
