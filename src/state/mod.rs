// State management module
//
// Wraps AppState with thread-safe access via Arc<RwLock<T>> and emits
// change events over a tokio broadcast channel for GUI updates.

use crate::models::AppState;
use crate::services::status::StatusUpdate;
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// Emitted so interested parties (primarily the GUI) learn about state
/// changes without polling.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A form field changed
    ConfigurationChanged {
        is_ready: bool,
    },

    /// A crack session has started
    CrackStarted,

    /// The crack session has finished
    CrackFinished {
        exit_code: Option<i32>,
    },

    /// The status strip fields changed
    StatusUpdated {
        phase: String,
        recovered: String,
    },

    /// Settings have been updated
    SettingsChanged,

    /// Session state has been reset
    StateReset,
}

/// Thread-safe state manager with event emission
///
/// The central state component: holds [`AppState`] behind `Arc<RwLock<T>>`,
/// diffs old against new state on every [`update()`](Self::update), and
/// broadcasts [`StateChange`] events to subscribers.
///
/// Always go through `StateManager` instead of touching [`AppState`]
/// directly: [`read()`](Self::read) for reads, [`update()`](Self::update)
/// for mutations, [`subscribe()`](Self::subscribe) for change events.
pub struct StateManager {
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for state change events; multiple subscribers can
    /// listen concurrently.
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state and a broadcast buffer
    /// of 100 events.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a read-only clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events.
    ///
    /// Captures the old state, applies the mutation, diffs, and broadcasts
    /// one event per detected change category. Returns the emitted events.
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = self.detect_changes(&old_state, &state);

        for change in &changes {
            // Send errors just mean no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn detect_changes(&self, old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        // Form configuration changes
        if old.hash_file_path != new.hash_file_path
            || old.hash_type != new.hash_type
            || old.attack_mode_code != new.attack_mode_code
            || old.wordlist != new.wordlist
            || old.mask != new.mask
        {
            changes.push(StateChange::ConfigurationChanged {
                is_ready: new.is_hash_file_selected(),
            });
        }

        // Session transitions
        if old.is_running != new.is_running {
            if new.is_running {
                changes.push(StateChange::CrackStarted);
            } else {
                changes.push(StateChange::CrackFinished {
                    exit_code: new.last_exit_code,
                });
            }
        }

        // Status strip changes
        if old.status_phase != new.status_phase || old.recovered != new.recovered {
            changes.push(StateChange::StatusUpdated {
                phase: new.status_phase.clone(),
                recovered: new.recovered.clone(),
            });
        }

        // Settings changes
        if old.hashcat_exe != new.hashcat_exe || old.debug_mode != new.debug_mode {
            changes.push(StateChange::SettingsChanged);
        }

        changes
    }

    // Convenience methods for common state updates

    /// Set the hash file path chosen in the file dialog.
    pub fn set_hash_file_path(&self, path: Option<Utf8PathBuf>) -> Vec<StateChange> {
        self.update(|state| {
            state.hash_file_path = path.clone();
        })
    }

    /// Set the hash type code selected in the combo box.
    pub fn set_hash_type(&self, code: u32) -> Vec<StateChange> {
        self.update(|state| {
            state.hash_type = code;
        })
    }

    /// Set the attack mode code selected in the combo box.
    pub fn set_attack_mode(&self, code: u32) -> Vec<StateChange> {
        self.update(|state| {
            state.attack_mode_code = code;
        })
    }

    /// Set the wordlist path text field.
    pub fn set_wordlist(&self, wordlist: String) -> Vec<StateChange> {
        self.update(|state| {
            state.wordlist = wordlist;
        })
    }

    /// Set the mask text field.
    pub fn set_mask(&self, mask: String) -> Vec<StateChange> {
        self.update(|state| {
            state.mask = mask;
        })
    }

    /// Mark a session as started.
    pub fn begin_session(&self) -> Vec<StateChange> {
        self.update(|state| {
            state.begin_session();
        })
    }

    /// Mark the running session as finished.
    pub fn end_session(&self, exit_code: Option<i32>) -> Vec<StateChange> {
        self.update(|state| {
            state.end_session(exit_code);
        })
    }

    /// Count a forwarded output line. Intentionally emits no event - the
    /// console is fed directly from the monitor channel.
    pub fn record_line(&self) {
        let mut state = self.state.write().unwrap();
        state.lines_received += 1;
    }

    /// Apply a recognized status report field to the status strip.
    pub fn apply_status_update(&self, update: &StatusUpdate) -> Vec<StateChange> {
        self.update(|state| match update {
            StatusUpdate::Phase(phase) => state.status_phase = phase.clone(),
            StatusUpdate::Recovered(recovered) => state.recovered = recovered.clone(),
        })
    }

    /// Reset all session-related state.
    pub fn reset_session_state(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.reset_session_state();
        });

        let reset_event = StateChange::StateReset;
        let _ = self.state_tx.send(reset_event.clone());
        changes.push(reset_event);

        changes
    }

    /// Update settings.
    pub fn update_settings<F>(&self, settings_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        self.update(settings_fn)
    }

    /// Populate state from the loaded user configuration.
    pub fn load_from_user_config(&self, user_config: &crate::models::UserConfig) -> Vec<StateChange> {
        self.update(|state| {
            let settings = &user_config.settings;

            if !settings.hashcat_exe.is_empty() {
                state.hashcat_exe = settings.hashcat_exe.clone();
            }
            state.hash_type = settings.hash_type;
            state.attack_mode_code = settings.attack_mode;
            state.wordlist = settings.wordlist.clone();
            state.mask = settings.mask.clone();
            state.debug_mode = settings.debug_mode;

            tracing::info!(
                "Loaded user config: exe={}, hash_type={}, attack_mode={}, debug={}",
                state.hashcat_exe,
                state.hash_type,
                state.attack_mode_code,
                state.debug_mode
            );
        })
    }

    /// Get an Arc reference to the state for worker threads.
    pub fn state_arc(&self) -> Arc<RwLock<AppState>> {
        Arc::clone(&self.state)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_manager() {
        let manager = StateManager::new();
        let state = manager.snapshot();

        assert!(!state.is_running);
        assert!(!state.is_hash_file_selected());
        assert_eq!(state.lines_received, 0);
    }

    #[test]
    fn test_configuration_change_detection() {
        let manager = StateManager::new();

        let changes = manager.set_hash_file_path(Some(Utf8PathBuf::from("/tmp/hashes.txt")));

        assert_eq!(changes.len(), 1);
        assert!(matches!(
            changes[0],
            StateChange::ConfigurationChanged { is_ready: true }
        ));

        let changes = manager.set_mask("?l?l?l".to_string());
        assert!(matches!(
            changes[0],
            StateChange::ConfigurationChanged { is_ready: true }
        ));
    }

    #[test]
    fn test_session_transitions() {
        let manager = StateManager::new();

        let changes = manager.begin_session();
        assert!(matches!(changes[0], StateChange::CrackStarted));
        assert!(manager.read(|s| s.is_running));

        let changes = manager.end_session(Some(0));
        assert!(matches!(
            changes[0],
            StateChange::CrackFinished { exit_code: Some(0) }
        ));
        assert!(!manager.read(|s| s.is_running));
    }

    #[test]
    fn test_status_updates() {
        let manager = StateManager::new();

        let changes =
            manager.apply_status_update(&StatusUpdate::Phase("Running".to_string()));
        assert!(matches!(changes[0], StateChange::StatusUpdated { .. }));

        manager.apply_status_update(&StatusUpdate::Recovered("1/1".to_string()));
        let state = manager.snapshot();
        assert_eq!(state.status_phase, "Running");
        assert_eq!(state.recovered, "1/1");
    }

    #[test]
    fn test_record_line_emits_no_event() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe();

        manager.record_line();
        manager.record_line();

        assert_eq!(manager.read(|s| s.lines_received), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_settings_change_detection() {
        let manager = StateManager::new();

        let changes = manager.update_settings(|state| {
            state.hashcat_exe = "/opt/hashcat/hashcat.bin".to_string();
        });

        assert!(matches!(changes[0], StateChange::SettingsChanged));
    }

    #[test]
    fn test_reset_session_state() {
        let manager = StateManager::new();
        manager.begin_session();
        manager.end_session(Some(2));

        let changes = manager.reset_session_state();
        assert!(changes.iter().any(|c| matches!(c, StateChange::StateReset)));
        assert_eq!(manager.read(|s| s.last_exit_code), None);
    }

    #[test]
    fn test_subscribe_to_changes() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe();

        manager.begin_session();

        let event = rx.try_recv();
        assert!(matches!(event, Ok(StateChange::CrackStarted)));
    }

    #[test]
    fn test_load_from_user_config() {
        use crate::models::UserConfig;

        let manager = StateManager::new();
        let mut config = UserConfig::default();
        config.settings.hash_type = 2500;
        config.settings.attack_mode = 3;
        config.settings.mask = "?d?d?d?d".to_string();

        manager.load_from_user_config(&config);

        let state = manager.snapshot();
        assert_eq!(state.hash_type, 2500);
        assert_eq!(state.attack_mode_code, 3);
        assert_eq!(state.mask, "?d?d?d?d");
        assert_eq!(state.hashcat_exe, "hashcat");
    }

    #[test]
    fn test_clone_shares_state() {
        let manager1 = StateManager::new();
        let manager2 = manager1.clone();

        manager1.set_hash_type(1800);

        assert_eq!(manager2.read(|s| s.hash_type), 1800);
    }
}
